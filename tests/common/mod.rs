#![allow(dead_code, unused_imports)]

pub use idlemon_test_utils::builders;
pub use idlemon_test_utils::fake_backend::FakeProcessBackend;
pub use idlemon_test_utils::fake_idle::FakeIdleSource;
pub use idlemon_test_utils::{active, capture_logs, idle, init_tracing, with_timeout};
