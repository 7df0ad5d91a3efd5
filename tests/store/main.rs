mod subscribers;
