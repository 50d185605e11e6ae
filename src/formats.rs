use crate::{deferred_now::DeferredNow, record::Record, LoggingError, Severity};
use regex::Regex;
use std::{io::Write, path::Path, sync::OnceLock};

/// The pattern used when no `format` is configured:
/// timestamp, colored level, and the message.
///
/// ```text
///  2024/05/17 - 10:02:44.123 ▶ WARNIN upstream timeout
/// ```
pub const DEFAULT_PATTERN: &str =
    " %{time:%Y/%m/%d - %H:%M:%S%.3f} %{color}▶ %{level:.6s}%{color:reset} %{message}";

/// The pattern used with `format = "logstash"`: a single-line JSON object.
pub const LOGSTASH_PATTERN: &str = concat!(
    r#"{"@timestamp":"%{time:%Y-%m-%dT%H:%M:%S%.3f%:z}", "@version": 1, "#,
    r#""level": %{level:json}, "message": %{message:json}, "module": %{module:json}}"#
);

/// Identifies the sink for which a [`FormatSelector`] has to choose a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// One of the writers that were handed to the factory, with its position.
    Writer(usize),
    /// The process's standard output.
    Stdout,
    /// The syslog.
    Syslog,
}

/// Chooses the line pattern for a sink, given the pattern that results
/// from the configuration.
pub type FormatSelector = fn(sink: &SinkKind, active_pattern: &str) -> String;

/// Uses the pattern that results from the configuration for all sinks.
#[must_use]
pub fn default_format_selector(_sink: &SinkKind, active_pattern: &str) -> String {
    active_pattern.to_owned()
}

/// A parsed line pattern.
///
/// Patterns consist of literal text and verbs of the form `%{verb}` or `%{verb:arg}`:
///
/// | verb | arg | output |
/// |------|-----|--------|
/// | `time` | chrono strftime format | timestamp; RFC 3339 if no arg is given |
/// | `level` | printf-like spec, e.g. `.6s`, or `json` | severity name |
/// | `message` | printf-like spec, or `json` | message |
/// | `module` | printf-like spec, or `json` | module tag of the logger |
/// | `id` | printf-like spec, e.g. `03x` | sequence number of the record |
/// | `pid` | printf-like spec | process id |
/// | `program` | printf-like spec | name of the executable |
/// | `shortfile`, `longfile` | printf-like spec | source location of the log call |
/// | `color` | none, `reset`, or `bold` | ANSI color sequence matching the severity |
///
/// The printf-like spec has the form `[-][0][width][.precision](s|d|x|X)`;
/// with `json`, the value is written as a quoted and escaped JSON string.
/// `%%` produces a literal `%`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    elements: Vec<Element>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Element {
    Literal(String),
    Time(Option<String>),
    Level(Spec),
    Message(Spec),
    Json(JsonField),
    Module(Spec),
    Id(Spec),
    Pid(Spec),
    Program(Spec),
    ShortFile(Spec),
    LongFile(Spec),
    Color(ColorVerb),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JsonField {
    Level,
    Message,
    Module,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorVerb {
    Severity,
    Reset,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Conversion {
    Str,
    Decimal,
    LowerHex,
    UpperHex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}
impl Spec {
    const STR: Spec = Spec {
        left_align: false,
        zero_pad: false,
        width: 0,
        precision: None,
        conversion: Conversion::Str,
    };
    const DECIMAL: Spec = Spec {
        conversion: Conversion::Decimal,
        ..Spec::STR
    };

    fn parse(arg: &str) -> Result<Self, LoggingError> {
        static SPEC_RE: OnceLock<Regex> = OnceLock::new();
        let re = SPEC_RE.get_or_init(|| {
            Regex::new(r"^(-)?(0)?(\d+)?(?:\.(\d+))?([sdxX])$").unwrap(/* ok: constant */)
        });
        let caps = re
            .captures(arg)
            .ok_or_else(|| LoggingError::InvalidPattern(format!("invalid verb argument {arg:?}")))?;
        let number = |i: usize| -> Result<Option<usize>, LoggingError> {
            caps.get(i)
                .map(|m| {
                    m.as_str()
                        .parse::<usize>()
                        .map_err(|e| LoggingError::InvalidPattern(e.to_string()))
                })
                .transpose()
        };
        Ok(Spec {
            left_align: caps.get(1).is_some(),
            zero_pad: caps.get(2).is_some(),
            width: number(3)?.unwrap_or(0),
            precision: number(4)?,
            conversion: match &caps[5] {
                "s" => Conversion::Str,
                "d" => Conversion::Decimal,
                "x" => Conversion::LowerHex,
                _ => Conversion::UpperHex,
            },
        })
    }

    fn parse_or(o_arg: Option<&str>, default: Spec) -> Result<Self, LoggingError> {
        o_arg.map_or(Ok(default), Spec::parse)
    }

    fn expect_str(self, verb: &str) -> Result<Self, LoggingError> {
        if self.conversion == Conversion::Str {
            Ok(self)
        } else {
            Err(LoggingError::InvalidPattern(format!(
                "verb {verb} only supports string conversion"
            )))
        }
    }

    fn write_str(self, w: &mut dyn Write, s: &str) -> std::io::Result<()> {
        let s = match self.precision {
            Some(precision) => s.char_indices().nth(precision).map_or(s, |(i, _)| &s[..i]),
            None => s,
        };
        self.pad(w, s, s.chars().count(), ' ')
    }

    fn write_num(self, w: &mut dyn Write, n: u64) -> std::io::Result<()> {
        let s = match self.conversion {
            Conversion::Str | Conversion::Decimal => n.to_string(),
            Conversion::LowerHex => format!("{n:x}"),
            Conversion::UpperHex => format!("{n:X}"),
        };
        let fill = if self.zero_pad && !self.left_align { '0' } else { ' ' };
        self.pad(w, &s, s.len(), fill)
    }

    fn pad(self, w: &mut dyn Write, s: &str, len: usize, fill: char) -> std::io::Result<()> {
        let padding: String = std::iter::repeat_n(fill, self.width.saturating_sub(len)).collect();
        if self.left_align {
            write!(w, "{s}{padding}")
        } else {
            write!(w, "{padding}{s}")
        }
    }
}

impl Pattern {
    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// [`LoggingError::InvalidPattern`] if the pattern contains an unknown verb,
    /// an invalid verb argument, or an unterminated `%{`.
    pub fn parse(pattern: &str) -> Result<Self, LoggingError> {
        static VERB_RE: OnceLock<Regex> = OnceLock::new();
        let re = VERB_RE
            .get_or_init(|| Regex::new(r"%%|%\{(\w+)(?::([^}]*))?\}").unwrap(/* ok: constant */));

        let mut elements = Vec::new();
        let mut literal = String::new();
        let mut last_end = 0;
        for caps in re.captures_iter(pattern) {
            let whole = caps.get(0).unwrap(/* ok: group 0 always exists */);
            literal.push_str(&pattern[last_end..whole.start()]);
            last_end = whole.end();

            let Some(verb) = caps.get(1) else {
                literal.push('%');
                continue;
            };
            if !literal.is_empty() {
                elements.push(Element::Literal(std::mem::take(&mut literal)));
            }
            elements.push(Self::parse_verb(
                verb.as_str(),
                caps.get(2).as_ref().map(regex::Match::as_str),
            )?);
        }
        literal.push_str(&pattern[last_end..]);
        if literal.contains("%{") {
            return Err(LoggingError::InvalidPattern(format!(
                "unterminated or malformed verb in {pattern:?}"
            )));
        }
        if !literal.is_empty() {
            elements.push(Element::Literal(literal));
        }
        Ok(Self { elements })
    }

    fn parse_verb(verb: &str, o_arg: Option<&str>) -> Result<Element, LoggingError> {
        Ok(match verb {
            "time" => Element::Time(o_arg.filter(|a| !a.is_empty()).map(ToOwned::to_owned)),
            "level" if o_arg == Some("json") => Element::Json(JsonField::Level),
            "message" if o_arg == Some("json") => Element::Json(JsonField::Message),
            "module" if o_arg == Some("json") => Element::Json(JsonField::Module),
            "level" => Element::Level(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "message" => Element::Message(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "module" => Element::Module(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "id" => Element::Id(Spec::parse_or(o_arg, Spec::DECIMAL)?),
            "pid" => Element::Pid(Spec::parse_or(o_arg, Spec::DECIMAL)?),
            "program" => Element::Program(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "shortfile" => Element::ShortFile(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "longfile" => Element::LongFile(Spec::parse_or(o_arg, Spec::STR)?.expect_str(verb)?),
            "color" => Element::Color(match o_arg {
                None | Some("") => ColorVerb::Severity,
                Some("reset") => ColorVerb::Reset,
                Some("bold") => ColorVerb::Bold,
                Some(other) => {
                    return Err(LoggingError::InvalidPattern(format!(
                        "unknown color argument {other:?}"
                    )))
                }
            }),
            unknown => {
                return Err(LoggingError::InvalidPattern(format!(
                    "unknown verb {unknown:?}"
                )))
            }
        })
    }

    /// Renders the record according to this pattern, without line break.
    ///
    /// # Errors
    ///
    /// `std::io::Error` from writing to the given output stream.
    pub fn render(
        &self,
        w: &mut dyn Write,
        now: &mut DeferredNow,
        record: &Record,
    ) -> std::io::Result<()> {
        for element in &self.elements {
            match element {
                Element::Literal(s) => w.write_all(s.as_bytes())?,
                Element::Time(Some(fmt)) => w.write_all(now.format(fmt).as_bytes())?,
                Element::Time(None) => w.write_all(now.format_rfc3339().as_bytes())?,
                Element::Level(spec) => spec.write_str(w, record.severity().as_str())?,
                Element::Message(spec) => spec.write_str(w, record.message())?,
                Element::Json(field) => {
                    let value = match field {
                        JsonField::Level => record.severity().as_str(),
                        JsonField::Message => record.message(),
                        JsonField::Module => record.module(),
                    };
                    serde_json::to_writer(&mut *w, value).map_err(std::io::Error::other)?;
                }
                Element::Module(spec) => spec.write_str(w, record.module())?,
                Element::Id(spec) => spec.write_num(w, record.id())?,
                Element::Pid(spec) => spec.write_num(w, u64::from(std::process::id()))?,
                Element::Program(spec) => spec.write_str(w, program_name())?,
                Element::ShortFile(spec) => {
                    let file = record
                        .file()
                        .and_then(|f| Path::new(f).file_name())
                        .map_or_else(|| "???".into(), |f| f.to_string_lossy());
                    spec.write_str(w, &format!("{file}:{}", record.line().unwrap_or(0)))?;
                }
                Element::LongFile(spec) => spec.write_str(
                    w,
                    &format!(
                        "{}:{}",
                        record.file().unwrap_or("???"),
                        record.line().unwrap_or(0)
                    ),
                )?,
                Element::Color(verb) => write_color(w, *verb, record.severity())?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Pattern {
    type Err = LoggingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub(crate) fn program_name() -> &'static str {
    static PROGRAM: OnceLock<String> = OnceLock::new();
    PROGRAM.get_or_init(|| {
        std::env::args()
            .next()
            .as_ref()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map_or_else(|| "unknown".to_owned(), |s| s.to_string_lossy().into_owned())
    })
}

#[cfg(feature = "colors")]
fn write_color(w: &mut dyn Write, verb: ColorVerb, severity: Severity) -> std::io::Result<()> {
    use nu_ansi_term::{Color, Style};
    match verb {
        ColorVerb::Severity => {
            let color = match severity {
                Severity::Critical => Color::Magenta,
                Severity::Error => Color::Red,
                Severity::Warning => Color::Yellow,
                Severity::Info => Color::White,
                Severity::Debug => Color::Cyan,
            };
            write!(w, "{}", color.prefix())
        }
        ColorVerb::Bold => write!(w, "{}", Style::new().bold().prefix()),
        ColorVerb::Reset => write!(w, "{}", Color::Default.suffix()),
    }
}

#[cfg(not(feature = "colors"))]
fn write_color(_w: &mut dyn Write, _verb: ColorVerb, _severity: Severity) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{Pattern, DEFAULT_PATTERN, LOGSTASH_PATTERN};
    use crate::{deferred_now::DeferredNow, record::Record, LoggingError, Severity};

    fn render(pattern: &str, record: &Record) -> String {
        let mut buf = Vec::new();
        Pattern::parse(pattern)
            .unwrap()
            .render(&mut buf, &mut DeferredNow::new(), record)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn record(severity: Severity, message: &str) -> Record<'static> {
        Record::new(
            42,
            severity,
            "KRAKEND",
            message.to_owned(),
            Some(("src/proxy/http.rs", 17)),
        )
    }

    #[test]
    fn test_verbs() {
        let r = record(Severity::Warning, "upstream timeout");
        assert_eq!(
            render("[%{level:.6s}] %{module}: %{message}", &r),
            "[WARNIN] KRAKEND: upstream timeout"
        );
        assert_eq!(render("%{id:05d}|%{id:x}|%{id:-4d}|", &r), "00042|2a|42  |");
        assert_eq!(render("%{level:-9s}|%{level:9s}|", &r), "WARNING  |  WARNING|");
        assert_eq!(render("%{shortfile} %{longfile}", &r), "http.rs:17 src/proxy/http.rs:17");
        assert_eq!(render("100%% %{message}", &r), "100% upstream timeout");
        assert_eq!(render("%{pid}", &r), std::process::id().to_string());
    }

    #[test]
    fn test_missing_location() {
        let r = Record::new(1, Severity::Info, "KRAKEND", "x".to_owned(), None);
        assert_eq!(render("%{shortfile}", &r), "???:0");
    }

    #[test]
    fn test_default_pattern() {
        let line = render(DEFAULT_PATTERN, &record(Severity::Critical, "boom"));
        assert!(line.starts_with(' '));
        assert!(line.contains("▶ "));
        assert!(line.contains("CRITIC"));
        assert!(!line.contains("CRITICAL"));
        assert!(line.ends_with(" boom"));
    }

    #[test]
    fn test_logstash_pattern_is_json() {
        let line = render(LOGSTASH_PATTERN, &record(Severity::Error, r#"say "hi""#));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["message"], r#"say "hi""#);
        assert_eq!(value["module"], "KRAKEND");
        assert_eq!(value["@version"], 1);
        assert!(value["@timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_logstash_escapes_module_and_level() {
        let r = Record::new(7, Severity::Warning, r#"gw"\edge"#, "m".to_owned(), None);
        let line = render(LOGSTASH_PATTERN, &r);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["module"], r#"gw"\edge"#);
        assert_eq!(value["level"], "WARNING");

        assert_eq!(render("%{module:json}|%{level:json}", &r), r#""gw\"\\edge"|"WARNING""#);
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in [
            "%{nonsense}",
            "%{level:abc}",
            "%{color:purple}",
            "%{module:3d}",
            "%{message",
        ] {
            assert!(
                matches!(Pattern::parse(bad), Err(LoggingError::InvalidPattern(_))),
                "pattern {bad:?} should be rejected"
            );
        }
    }

    #[cfg(feature = "colors")]
    #[test]
    fn test_colors() {
        let line = render("%{color}%{level}%{color:reset}", &record(Severity::Error, "e"));
        assert!(line.starts_with("\u{1b}["));
        assert!(line.ends_with("\u{1b}[0m"));
        assert!(line.contains("ERROR"));
    }
}
