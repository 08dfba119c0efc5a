//! Integration test harness for Campus Notify.

mod client_test;
mod emitter_test;
mod feed_test;
mod helpers;
mod identity_test;
mod preference_test;
mod retention_test;
