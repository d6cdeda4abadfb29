mod workbench_test;
