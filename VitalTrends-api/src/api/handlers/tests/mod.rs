mod vital_trends_test;
