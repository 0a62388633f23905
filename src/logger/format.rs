//! Access log line rendering
//!
//! `logging.access_log_format` picks one of `default`, `common`, `combined`
//! or `json`. Any other value is a pattern with `$variable` placeholders.

use chrono::Local;

/// One handled request, captured after the response was decorated
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Peer socket address
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    /// Request URI path, as sent by the client
    pub path: String,
    /// Raw query string, no `?`
    pub query: Option<String>,
    /// `1.0` or `1.1`
    pub http_version: String,
    pub status: u16,
    /// Bytes in the response body (0 for HEAD)
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time from request parse to response decoration
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "default" => self.format_default(),
            "common" => self.format_common(),
            "combined" => self.format_combined(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// `[$time] "$request" $status $body_bytes_sent`
    fn format_default(&self) -> String {
        format!(
            "[{}] \"{}\" {} {}",
            self.time.format("%d/%b/%Y %H:%M:%S"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// CLF: `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// CLF plus referer and user agent
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$variable` placeholders
    ///
    /// | Variable           | Value                                  |
    /// |--------------------|----------------------------------------|
    /// | `$remote_addr`     | peer address                           |
    /// | `$time_local`      | `10/Oct/2000:13:55:36 -0700`           |
    /// | `$time_iso8601`    | RFC 3339 timestamp                     |
    /// | `$request`         | `GET /path?q HTTP/1.1`                 |
    /// | `$request_method`  | method                                 |
    /// | `$request_uri`     | path plus query                        |
    /// | `$status`          | status code                            |
    /// | `$body_bytes_sent` | body length                            |
    /// | `$http_referer`    | `Referer` or `-`                       |
    /// | `$http_user_agent` | `User-Agent` or `-`                    |
    /// | `$request_time`    | seconds, millisecond precision         |
    ///
    /// Placeholders are expanded in one pass over the pattern, so a `$` inside
    /// a substituted value (e.g. a request path) is written as is. Unknown
    /// names are kept literally.
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..name_len];

            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[name_len..];
        }

        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> Option<String> {
        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time_local(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => self.request_line(),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "http_user_agent" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/static/app.js".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 200;
        entry.body_bytes = 1234;
        entry.referer = Some("http://localhost:3000/".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_default() {
        let entry = sample();
        let log = entry.format("default");
        assert!(log.starts_with('['));
        assert!(log.ends_with("] \"GET /static/app.js?v=2 HTTP/1.1\" 200 1234"));
        assert!(!log.contains("192.168.1.1"));
    }

    #[test]
    fn test_format_common() {
        let entry = sample();
        let log = entry.format("common");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /static/app.js?v=2 HTTP/1.1\" 200 1234"));
        assert!(!log.contains("Mozilla"));
    }

    #[test]
    fn test_format_combined() {
        let entry = sample();
        let log = entry.format("combined");
        assert!(log.ends_with("200 1234 \"http://localhost:3000/\" \"Mozilla/5.0\""));

        let mut bare = sample();
        bare.referer = None;
        bare.user_agent = None;
        assert!(bare.format("combined").ends_with("\"-\" \"-\""));
    }

    #[test]
    fn test_format_json() {
        let entry = sample();
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/static/app.js");
        assert_eq!(value["query"], "v=2");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 1234);
        assert_eq!(value["request_time_us"], 1500);
    }

    #[test]
    fn test_format_custom() {
        let mut entry = sample();
        entry.request_time_us = 1_250_000;
        let log = entry.format("$request_method $request_uri -> $status in $request_time");
        assert_eq!(log, "GET /static/app.js?v=2 -> 200 in 1.250");
    }

    #[test]
    fn test_format_custom_single_pass() {
        let mut entry = sample();
        entry.path = "/$status".to_string();
        entry.query = None;
        entry.status = 404;
        let log = entry.format("$request_uri $status $unknown $");
        assert_eq!(log, "/$status 404 $unknown $");

        entry.user_agent = Some("curl $http_referer".to_string());
        assert_eq!(entry.format("[$http_user_agent]"), "[curl $http_referer]");
    }
}
