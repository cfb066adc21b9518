//! Line templates
//!
//! Serialization templates are `printf`-like strings with four placeholders:
//!
//! | Placeholder | Consumes an argument | Emits |
//! |-------------|----------------------|-------|
//! | `%s`        | yes                  | the argument as text (nothing if absent) |
//! | `%d`        | yes                  | the argument as a number |
//! | `%v`        | yes                  | nothing |
//! | `%%`        | no                   | `%` |
//!
//! `%v` exists so that a template can skip an optional field in the middle
//! of the argument list without shifting the fields that follow it. When a
//! template runs out of arguments the remaining placeholders are emitted
//! literally; surplus arguments are ignored.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    combinator::{map, value},
    multi::many0,
    IResult,
};

use super::value::Value;

/// One piece of a parsed template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text copied as-is
    Literal(&'a str),
    /// `%s`
    Str,
    /// `%d`
    Num,
    /// `%v`
    Void,
    /// `%%`
    Percent,
}

impl Token<'_> {
    fn placeholder(&self) -> &'static str {
        match self {
            Token::Str => "%s",
            Token::Num => "%d",
            Token::Void => "%v",
            Token::Percent => "%%",
            Token::Literal(_) => "",
        }
    }
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::Str, tag("%s")),
        value(Token::Num, tag("%d")),
        value(Token::Void, tag("%v")),
        value(Token::Percent, tag("%%")),
        map(take_till1(|c| c == '%'), Token::Literal),
        // A `%` that does not start a placeholder
        map(tag("%"), Token::Literal),
    ))(input)
}

/// Split a template into literal runs and placeholders
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    many0(token)(template)
        .map(|(_, tokens)| tokens)
        .unwrap_or_default()
}

/// Render a template against positional arguments.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::{format_line, Value};
///
/// let args = [Some(Value::Int(1)), None, Some(Value::from("urn:x"))];
/// assert_eq!(format_line("extmap:%d%v %s", &args), "extmap:1 urn:x");
/// ```
pub fn format_line(template: &str, args: &[Option<Value>]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut args = args.iter();

    for token in tokenize(template) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Percent => out.push('%'),
            placeholder => match args.next() {
                None => out.push_str(placeholder.placeholder()),
                Some(arg) => match placeholder {
                    Token::Str => {
                        if let Some(arg) = arg {
                            out.push_str(&arg.to_string());
                        }
                    }
                    Token::Num => match arg {
                        Some(arg) => out.push_str(&arg.to_number_string()),
                        None => out.push_str("NaN"),
                    },
                    _ => {}
                },
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("rtpmap:%d %s/%s"),
            vec![
                Token::Literal("rtpmap:"),
                Token::Num,
                Token::Literal(" "),
                Token::Str,
                Token::Literal("/"),
                Token::Str,
            ]
        );
        assert_eq!(tokenize("100%% %x"), vec![
            Token::Literal("100"),
            Token::Percent,
            Token::Literal(" "),
            Token::Literal("%"),
            Token::Literal("x"),
        ]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_void_keeps_alignment() {
        let args = [
            Some(Value::Int(3)),
            None,
            Some(Value::from("urn:ietf:params:rtp-hdrext:encrypt")),
            Some(Value::from("urn:ietf:params:rtp-hdrext:smpte-tc")),
            Some(Value::from("25@600/24")),
        ];
        assert_eq!(
            format_line("extmap:%d%v %s %s %s", &args),
            "extmap:3 urn:ietf:params:rtp-hdrext:encrypt urn:ietf:params:rtp-hdrext:smpte-tc 25@600/24"
        );
    }

    #[test]
    fn test_surplus_arguments_discarded() {
        let args = [Some(Value::Int(0)), Some(Value::from("PCMU")), None, None];
        assert_eq!(format_line("rtpmap:%d %s", &args), "rtpmap:0 PCMU");
    }

    #[test]
    fn test_missing_arguments_left_literal() {
        assert_eq!(format_line("%s %s", &[Some(Value::from("a"))]), "a %s");
    }

    #[test]
    fn test_percent_does_not_consume() {
        let args = [Some(Value::Int(50))];
        assert_eq!(format_line("%%%d", &args), "%50");
    }
}
