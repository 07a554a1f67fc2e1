//! JSON encoding for layout loads and save bodies.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{LayoutRecord, SaveResponse};

/// Errors from encoding or decoding wire payloads.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A layout payload that is neither a record array nor `{layout: [...]}`.
    #[error("layout: expected an array of records or an object with a `layout` array")]
    LayoutShape,

    /// One record of a layout failed to decode.
    #[error("layout record {index}: {source}")]
    Record {
        /// Zero-based position in the layout array.
        index: usize,
        /// Underlying decode error.
        source: serde_json::Error,
    },
}

/// Encode a request body.
pub fn encode<T: Serialize>(body: &T) -> Result<String, Error> {
    Ok(serde_json::to_string(body)?)
}

/// Decode any wire payload.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(text)?)
}

/// Decode the initial layout handed over by the hosting page.
///
/// Accepts either a bare array of records or an object with a `layout`
/// array, the latter being the same shape the full save posts.
pub fn decode_layout(text: &str) -> Result<Vec<LayoutRecord>, Error> {
    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("layout") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::LayoutShape),
        },
        _ => return Err(Error::LayoutShape),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| Error::Record { index, source })
        })
        .collect()
}

/// Decode a save reply.
pub fn decode_response(text: &str) -> Result<SaveResponse, Error> {
    decode(text)
}

#[cfg(test)]
mod tests {
    use tilegrid_geom::Rect;
    use tilegrid_ids::WidgetId;

    use super::*;
    use crate::{SaveLayoutRequest, SaveWidgetRequest};

    #[test]
    fn full_save_body_shape() {
        let body = SaveLayoutRequest {
            layout: vec![
                LayoutRecord::new(WidgetId::Int(1), Rect::new(1, 4, 1, 3)),
                LayoutRecord::new(WidgetId::name("notes"), Rect::new(5, 2, 1, 1)),
            ],
        };
        let json = encode(&body).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"layout":[{"id":1,"colStart":1,"colSpan":4,"rowStart":1,"rowSpan":3},"#,
                r#"{"id":"notes","colStart":5,"colSpan":2,"rowStart":1,"rowSpan":1}]}"#
            )
        );
    }

    #[test]
    fn widget_save_body_is_flat() {
        let body = SaveWidgetRequest {
            record: LayoutRecord::new(WidgetId::Int(9), Rect::new(3, 4, 1, 3)),
        };
        let v: serde_json::Value = serde_json::from_str(&encode(&body).unwrap()).unwrap();
        assert_eq!(v["id"], 9);
        assert_eq!(v["colStart"], 3);
        assert_eq!(v["rowSpan"], 3);
    }

    #[test]
    fn load_accepts_widget_id_and_both_shapes() {
        let bare = r#"[{"widgetId":"a","colStart":1,"colSpan":2,"rowStart":1,"rowSpan":1}]"#;
        let wrapped = r#"{"layout":[{"id":"a","colStart":1,"colSpan":2,"rowStart":1,"rowSpan":1}]}"#;
        let a = decode_layout(bare).unwrap();
        let b = decode_layout(wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].id, WidgetId::name("a"));
        assert_eq!(a[0].rect, Rect::new(1, 2, 1, 1));
    }

    #[test]
    fn response_message_is_optional() {
        let ok = decode_response(r#"{"success":true}"#).unwrap();
        assert_eq!(ok, SaveResponse::ok());
        let bad = decode_response(r#"{"success":false,"message":"locked"}"#).unwrap();
        assert_eq!(bad, SaveResponse::rejected("locked"));
        assert!(decode_response("not json").is_err());
    }

    #[test]
    fn negative_fields_load_for_sanitizing() {
        let recs = decode_layout(
            r#"[{"widgetId":1,"colStart":-1,"colSpan":4,"rowStart":1,"rowSpan":-3}]"#,
        )
        .unwrap();
        assert_eq!(recs[0].rect, Rect::new(0, 4, 1, 0));
    }

    #[test]
    fn layout_errors_name_the_problem() {
        let err = decode_layout(r#"{"widgets":[]}"#).unwrap_err();
        assert!(matches!(err, Error::LayoutShape));

        let err = decode_layout(
            r#"[{"id":1,"colStart":1,"colSpan":1,"rowStart":1,"rowSpan":1},{"id":2,"colStart":1}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Record { index: 1, .. }));
        assert!(err.to_string().contains("colSpan"), "{err}");
    }
}
