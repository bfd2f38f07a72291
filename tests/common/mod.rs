//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    use chrono::{Duration, Utc};
    use mockito::{Matcher, Mock, ServerGuard};
    use rap2_client::{Captcha, CaptchaSolver, Rap2Client, Rap2ClientBuilder, Session};
    use serde_json::json;

    pub const ACCOUNT: &str = "admin@example.com";
    pub const PASSWORD: &str = "secret";
    pub const CAPTCHA_COOKIE: &str = "captcha.sid=c1";
    pub const SESSION_COOKIE: &str = "koa.sid=s1; koa.sid.sig=x1";

    /// Reply body of a Rap2 endpoint that refuses the session
    pub const DENIED_BODY: &str = r#"{"isOk":false,"errMsg":"您没有访问权限"}"#;

    /// Captcha solver that always answers `abcd` and counts its calls
    #[derive(Debug, Default)]
    pub struct FixedSolver {
        pub calls: AtomicUsize,
    }

    impl CaptchaSolver for FixedSolver {
        fn solve(&self, _captcha: &Captcha) -> rap2_client::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("abcd".to_string())
        }
    }

    /// Builder pointed at the mock server with a short timeout
    pub fn builder(server: &ServerGuard) -> Rap2ClientBuilder {
        Rap2Client::builder(server.url()).timeout(StdDuration::from_secs(5))
    }

    /// Client with credentials and an automatic captcha solver
    pub fn client_with_solver(server: &ServerGuard) -> (Rap2Client, Arc<FixedSolver>) {
        let solver = Arc::new(FixedSolver::default());
        let client = builder(server)
            .credentials(ACCOUNT, PASSWORD)
            .captcha_solver(solver.clone())
            .build()
            .unwrap();
        (client, solver)
    }

    /// A session valid for another hour
    pub fn valid_session(cookies: &str) -> Session {
        Session::new(cookies, Utc::now() + Duration::hours(1))
    }

    /// `GET /captcha` answering an SVG and the captcha cookie
    pub fn mock_captcha(server: &mut ServerGuard, hits: usize) -> Mock {
        server
            .mock("GET", "/captcha")
            .with_status(200)
            .with_header("content-type", "image/svg+xml; charset=utf-8")
            .with_header("set-cookie", &format!("{CAPTCHA_COOKIE}; path=/; httponly"))
            .with_body("<svg/>")
            .expect(hits)
            .create()
    }

    /// `POST /account/login` accepting the solved captcha
    pub fn mock_login(server: &mut ServerGuard, hits: usize) -> Mock {
        server
            .mock("POST", "/account/login")
            .match_header("cookie", CAPTCHA_COOKIE)
            .match_header("content-type", "application/json;charset=utf-8")
            .match_body(Matcher::Json(json!({
                "email": ACCOUNT,
                "password": PASSWORD,
                "captcha": "abcd",
            })))
            .with_status(200)
            .with_header("set-cookie", "koa.sid=s1; path=/; httponly")
            .with_header("set-cookie", "koa.sid.sig=x1; path=/; httponly")
            .with_body(
                json!({"data": {"id": 3, "fullname": "Admin", "email": ACCOUNT, "empId": "007"}})
                    .to_string(),
            )
            .expect(hits)
            .create()
    }

    /// Login endpoint that must not be reached
    pub fn mock_no_login(server: &mut ServerGuard) -> Mock {
        server
            .mock("POST", "/account/login")
            .with_status(500)
            .expect(0)
            .create()
    }

    /// Path matcher ignoring the query string
    pub fn path(prefix: &str) -> Matcher {
        Matcher::Regex(format!("^{}", regex_escape(prefix)))
    }

    fn regex_escape(s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '.' | '?' | '+' | '*' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\' => {
                    vec!['\\', c]
                }
                _ => vec![c],
            })
            .collect()
    }
}
