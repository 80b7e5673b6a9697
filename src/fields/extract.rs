//! Context-to-field extraction.

use chrono::{DateTime, Utc};

use crate::context::{ContextKey, ContextValue, KeyKind, LogContext};
use crate::fields::{elapsed, object_ids, response, Field, Fields};

/// Name of the field carrying the local hostname.
pub const SERVER_FIELD: &str = "server";

/// Build the field list for one record, capturing "now" once.
pub fn extract_fields(ctx: Option<&dyn LogContext>, hostname: &str) -> Fields {
    extract_fields_at(ctx, hostname, Utc::now())
}

/// Build the field list for one record at a fixed instant.
///
/// `server` always comes first. Without a context nothing else is added.
pub fn extract_fields_at(
    ctx: Option<&dyn LogContext>,
    hostname: &str,
    now: DateTime<Utc>,
) -> Fields {
    let mut fields = Fields::with_capacity(8);
    fields.push(Field::string(SERVER_FIELD, hostname));
    if let Some(ctx) = ctx {
        fields.extend(context_fields(ctx, now));
    }
    fields
}

/// Fields read from the context alone, without `server`.
pub fn context_fields(ctx: &dyn LogContext, now: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();

    for &key in ContextKey::ALL {
        match key.kind() {
            KeyKind::Text => {
                if let Some(ContextValue::Str(s)) = ctx.value(key) {
                    fields.push(Field::string(key.name(), s));
                }
            }
            KeyKind::Unsigned => {
                if let Some(n) = ctx.value(key).and_then(|v| v.as_uint()) {
                    fields.push(Field::uint(key.name(), n));
                }
            }
            KeyKind::Start => {
                if let Some(start) = ctx.value(key).and_then(|v| v.as_time()) {
                    if !ContextValue::is_zero_time(&start) {
                        fields.push(Field::duration(key.derived_name(), elapsed(start, now)));
                    }
                }
            }
            KeyKind::Composite => {
                if let Some(ContextValue::Str(s)) = ctx.value(key) {
                    object_ids::decompose(&s, &mut fields);
                }
            }
            KeyKind::Secret | KeyKind::Transport => {}
        }
    }

    if let Some(metadata) = ctx.response_metadata() {
        response::augment(metadata, now, &mut fields);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::fields::FieldValue;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    #[test]
    fn test_absent_context_yields_only_server() {
        let fields = extract_fields(None, "web-1");
        assert_eq!(fields.names(), vec!["server"]);
        assert_eq!(fields.get_str("server"), Some("web-1"));
    }

    #[test]
    fn test_empty_context_yields_only_server() {
        let ctx = Context::background();
        let fields = extract_fields(Some(&ctx), "web-1");
        assert_eq!(fields.names(), vec!["server"]);
    }

    #[test]
    fn test_request_scenario() {
        let ctx = Context::background()
            .with_value(ContextKey::AccountId, "5d67d1af-204a-44e7-be70-e4e35059e1fb")
            .with_value(ContextKey::RequestIp, "127.0.0.1")
            .with_value(ContextKey::RequestUrl, "https://example.com")
            .with_value(ContextKey::ObjectIds, "tenantid=T1&workspaceid=W1");

        let fields = extract_fields(Some(&ctx), "web-1");

        assert_eq!(
            fields.names(),
            vec!["server", "accountId", "tenantid", "workspaceid", "requestIp", "requestUrl"]
        );
        assert_eq!(fields.get_str("accountId"), Some("5d67d1af-204a-44e7-be70-e4e35059e1fb"));
        assert_eq!(fields.get_str("requestIp"), Some("127.0.0.1"));
        assert_eq!(fields.get_str("requestUrl"), Some("https://example.com"));
        assert_eq!(fields.get_str("tenantid"), Some("T1"));
        assert_eq!(fields.get_str("workspaceid"), Some("W1"));
    }

    #[test]
    fn test_every_text_key_is_emitted_under_its_name() {
        let mut ctx = Context::background();
        for &key in ContextKey::ALL {
            if key.kind() == KeyKind::Text {
                ctx = ctx.with_value(key, format!("v-{}", key.name()));
            }
        }

        let fields = extract_fields(Some(&ctx), "web-1");
        for &key in ContextKey::ALL {
            if key.kind() == KeyKind::Text {
                let expected = format!("v-{}", key.name());
                assert_eq!(fields.get_str(key.name()), Some(expected.as_str()), "{key}");
            }
        }
    }

    #[test]
    fn test_empty_strings_are_dropped() {
        let ctx = Context::background()
            .with_value(ContextKey::AccountEmail, "")
            .with_value(ContextKey::WorkerId, "");
        let fields = extract_fields(Some(&ctx), "web-1");
        assert_eq!(fields.names(), vec!["server"]);
    }

    #[test]
    fn test_zero_numbers_are_emitted() {
        let ctx = Context::background()
            .with_value(ContextKey::ResponseCode, 0u64)
            .with_value(ContextKey::ResponseLength, 0u64)
            .with_value(ContextKey::Line, 0u64);
        let fields = extract_fields(Some(&ctx), "web-1");

        assert_eq!(fields.get("line"), Some(&FieldValue::Uint(0)));
        assert_eq!(fields.get("responseCode"), Some(&FieldValue::Uint(0)));
        assert_eq!(fields.get("responseLength"), Some(&FieldValue::Uint(0)));
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let ctx = Context::background()
            .with_value(ContextKey::ResponseCode, "200")
            .with_value(ContextKey::AccountId, 42u64)
            .with_value(ContextKey::RequestStart, "yesterday");
        let fields = extract_fields(Some(&ctx), "web-1");
        assert_eq!(fields.names(), vec!["server"]);
    }

    #[test]
    fn test_secrets_are_never_emitted() {
        let ctx = Context::background()
            .with_value(ContextKey::AccountJwt, "sampleJWT")
            .with_value(ContextKey::AccountXsrfState, "sampleXSRF");
        let fields = extract_fields(Some(&ctx), "web-1");
        assert_eq!(fields.names(), vec!["server"]);
    }

    #[test]
    fn test_request_duration() {
        let now = Utc::now();
        let ctx = Context::background()
            .with_value(ContextKey::RequestStart, now - ChronoDuration::milliseconds(1500));
        let fields = extract_fields_at(Some(&ctx), "web-1", now);
        assert_eq!(
            fields.get("requestDuration"),
            Some(&FieldValue::Duration(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn test_request_duration_with_real_clock() {
        let start = Utc::now() - ChronoDuration::seconds(2);
        let ctx = Context::background().with_value(ContextKey::RequestStart, start);
        let fields = extract_fields(Some(&ctx), "web-1");
        match fields.get("requestDuration") {
            Some(FieldValue::Duration(d)) => {
                assert!(*d >= Duration::from_secs(2));
                assert!(*d < Duration::from_secs(10));
            }
            other => panic!("unexpected requestDuration: {other:?}"),
        }
    }

    #[test]
    fn test_zero_start_has_no_duration() {
        let ctx = Context::background()
            .with_value(ContextKey::RequestStart, DateTime::<Utc>::default());
        let fields = extract_fields(Some(&ctx), "web-1");
        assert!(fields.get("requestDuration").is_none());
    }

    #[test]
    fn test_future_start_clamps_to_zero() {
        let now = Utc::now();
        let ctx = Context::background()
            .with_value(ContextKey::RequestStart, now + ChronoDuration::seconds(5));
        let fields = extract_fields_at(Some(&ctx), "web-1", now);
        assert_eq!(
            fields.get("requestDuration"),
            Some(&FieldValue::Duration(Duration::ZERO))
        );
    }

    #[test]
    fn test_composite_cannot_shadow_server() {
        let ctx = Context::background().with_value(ContextKey::ObjectIds, "server=evil&itemid=I1");
        let fields = extract_fields(Some(&ctx), "web-1");
        assert_eq!(fields.get_str("server"), Some("web-1"));
        assert_eq!(fields.get_str("itemid"), Some("I1"));
    }

    #[test]
    fn test_order_is_reproducible() {
        let now = Utc::now();
        let ctx = Context::background()
            .with_value(ContextKey::WorkerId, "w")
            .with_value(ContextKey::AccountEmail, "user@example.com")
            .with_value(ContextKey::Line, 7u64);
        let a = extract_fields_at(Some(&ctx), "web-1", now);
        let b = extract_fields_at(Some(&ctx), "web-1", now);
        assert_eq!(a, b);
        assert_eq!(a.names(), vec!["server", "accountEmail", "line", "workerId"]);
    }
}
