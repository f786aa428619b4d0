//! HTTP exchange with the remote calendar.
//!
//! The remote side is treated as a single calendar document at one URL: a
//! fetch reads and parses the whole document, a push uploads the serialized
//! group in one authenticated write.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::{KalsyncError, KalsyncResult};
use crate::event::Event;
use crate::ics;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic credentials for the remote calendar.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Client for one remote calendar URL.
pub struct RemoteCalendar {
    client: reqwest::Client,
    url: String,
}

impl RemoteCalendar {
    pub fn new(url: &str) -> Self {
        RemoteCalendar {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    /// Fetch the remote document and parse it into events.
    ///
    /// Reads may be anonymous; credentials are attached when given.
    #[instrument(skip(self, credentials), fields(url = %self.url))]
    pub async fn fetch(&self, credentials: Option<&Credentials>) -> KalsyncResult<Vec<Event>> {
        let mut request = self.client.get(&self.url).timeout(FETCH_TIMEOUT);
        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KalsyncError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let events = ics::parse_calendar(&body)?;
        debug!(count = events.len(), "fetched remote events");
        Ok(events)
    }

    /// Serialize the given events into one document and upload it.
    ///
    /// The write is a single atomic attempt: either the whole document is
    /// accepted or the attempt failed.
    #[instrument(skip(self, credentials, events), fields(url = %self.url))]
    pub async fn push(&self, credentials: &Credentials, events: &[Event]) -> KalsyncResult<()> {
        let document = ics::generate_calendar(events)?;

        let response = self
            .client
            .put(&self.url)
            .timeout(PUSH_TIMEOUT)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header("Content-Type", "text/calendar")
            .body(document)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(KalsyncError::Server {
                status: status.as_u16(),
            });
        }

        debug!(count = events.len(), "pushed events to remote");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REMOTE_DOC: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:remote-1\r\n\
SUMMARY:Budget review\r\n\
DTSTAMP:20250610T120000Z\r\n\
DTSTART;VALUE=DATE:20250620\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn test_event() -> Event {
        Event {
            uid: "local-1".to_string(),
            title: "Budget review".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            dtstamp: Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap(),
            alarm_minutes: None,
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_parses_remote_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendar.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string(REMOTE_DOC))
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let events = remote.fetch(None).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "remote-1");
        assert_eq!(events[0].title, "Budget review");
    }

    #[tokio::test]
    async fn test_fetch_sends_basic_auth_when_given() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendar.ics"))
            .and(header("Authorization", "Basic YWxpY2U6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(REMOTE_DOC))
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let events = remote.fetch(Some(&credentials())).await.unwrap();

        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendar.ics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let result = remote.fetch(None).await;

        assert!(matches!(result, Err(KalsyncError::Server { status: 503 })));
    }

    #[tokio::test]
    async fn test_fetch_unparsable_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendar.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let result = remote.fetch(None).await;

        assert!(matches!(result, Err(KalsyncError::Parse(_))));
    }

    #[tokio::test]
    async fn test_push_uploads_authenticated_calendar_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendar.ics"))
            .and(header("Authorization", "Basic YWxpY2U6c2VjcmV0"))
            .and(header("Content-Type", "text/calendar"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let result = remote.push(&credentials(), &[test_event()]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_push_status_400_and_up_is_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendar.ics"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let remote = RemoteCalendar::new(&format!("{}/calendar.ics", mock_server.uri()));
        let result = remote.push(&credentials(), &[test_event()]).await;

        assert!(matches!(result, Err(KalsyncError::Server { status: 500 })));
    }
}
