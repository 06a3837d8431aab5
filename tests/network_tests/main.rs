//! Network tests: a real server on a loopback port and the host client

mod session_tests;
