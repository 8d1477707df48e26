mod support;

mod driver_test;
mod igka_test;
mod kernel_test;
mod operators_test;
mod partition_test;
