/// InfluxDB Line Protocol rendering helper module.
/// https://docs.influxdata.com/influxdb/v1.7/write_protocols/line_protocol_tutorial/
///
/// Escaping here is a deliberately small subset of the protocol: whitespace and double quotes
/// are escaped in measurement names and tag values, nothing else. Commas and equals signs in
/// measurement names, tag keys or tag values are passed through as-is, so callers writing such
/// names will produce lines the server rejects or misparses.
use crate::point::{TagSet, Type};
use lazy_regex::{lazy_regex, Lazy, Regex};

pub static WHITESPACE: Lazy<Regex> = lazy_regex!(r"\s");
pub static QUOTES: Lazy<Regex> = lazy_regex!(r#"""#);

pub enum LineProtoTerm<'a> {
    Measurement(&'a str), // escape whitespace, quotes
    TagKey(&'a str),      // passed through
    TagValue(&'a Type),   // escape whitespace, quotes on text
}

impl LineProtoTerm<'_> {
    pub fn escape(self) -> String {
        use LineProtoTerm::*;
        match self {
            Measurement(x) => Self::escape_text(x),
            TagKey(x) => x.to_string(),
            TagValue(Type::Text(x)) => Self::escape_text(x),
            TagValue(x) => x.to_string(),
        }
    }

    fn escape_text(s: &str) -> String {
        let s = WHITESPACE.replace_all(s, r"\ ");
        QUOTES.replace_all(&s, r#"\""#).into_owned()
    }
}

/// Renders one line of line protocol.
///
/// `field` is taken verbatim, e.g. `value=1.5` or `ok=true`. The tag block follows the
/// measurement in the iteration order of `tags` and is omitted when `tags` is empty. The
/// timestamp is appended whenever one is given, including `0`. No trailing newline is added.
pub fn encode_line(measurement: &str, tags: &TagSet, field: &str, timestamp: Option<i64>) -> String {
    let mut line = LineProtoTerm::Measurement(measurement).escape();

    let tags = tags
        .iter()
        .map(|(key, value)| {
            format!(
                "{key}={value}",
                key = LineProtoTerm::TagKey(key).escape(),
                value = LineProtoTerm::TagValue(value).escape(),
            )
        })
        .collect::<Vec<String>>()
        .join(",");

    if !tags.is_empty() {
        line.push(',');
        line.push_str(&tags);
    }

    line.push(' ');
    line.push_str(field);

    if let Some(ts) = timestamp {
        line.push(' ');
        line.push_str(&ts.to_string());
    }

    line
}
