use nom::{
    bytes::complete::{take_till, take_till1, take_while},
    character::complete::{char, space0, space1, u32 as u32_parser},
    combinator::{all_consuming, opt},
    error::ParseError,
    sequence::{delimited, pair, separated_pair, terminated},
    IResult,
};

use super::HeightGrid;

/// Tag of the ASCII grayscale variant, the only one we can read.
pub const GRAYSCALE_ASCII_TAG: &str = "P2";

/// Tag, comment, dimensions and max value each take exactly one line.
const HEADER_LINES: usize = 4;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PgmParserError {
    #[error("Source is not a text file")]
    NotText,

    #[error("Missing PGM tag")]
    MissingTag,

    #[error("Can't process PGM files of type '{}', only {} is supported", .0, GRAYSCALE_ASCII_TAG)]
    UnsupportedTag(String),

    #[error("Missing comment line")]
    MissingComment,

    #[error("Missing dimension line")]
    MissingDimensions,

    #[error("Expected two positive integers 'columns rows' on line 3, found '{}'", .0)]
    InvalidDimensions(String),

    #[error("Missing max value line")]
    MissingMaxValue,

    #[error("Expected a max value between 1 and 65535 on line 4, found '{}'", .0)]
    InvalidMaxValue(String),

    #[error("Invalid sample '{token}' on line {line}")]
    InvalidSample { token: String, line: usize },

    #[error("Sample '{token}' on line {line} does not fit into 16 bit")]
    SampleOutOfRange { token: String, line: usize },

    #[error("Expected {expected} samples, found only {found}")]
    MissingSamples { expected: usize, found: usize },

    #[error("Expected {expected} samples, but line {line} holds more")]
    TooManySamples { expected: usize, line: usize },

    #[error("NOM returned an incomplete-error")]
    NomIncomplete,

    #[error("NOM returned an error: {}", .0.description())]
    Nom(nom::error::ErrorKind),
}

impl<I> ParseError<I> for PgmParserError {
    fn from_error_kind(_: I, kind: nom::error::ErrorKind) -> Self {
        PgmParserError::Nom(kind)
    }

    fn append(_: I, _: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<PgmParserError>> for PgmParserError {
    fn from(e: nom::Err<PgmParserError>) -> Self {
        match e {
            nom::Err::Incomplete(_) => Self::NomIncomplete,
            nom::Err::Error(pgm_err) => pgm_err,
            nom::Err::Failure(pgm_err) => pgm_err,
        }
    }
}

#[derive(Debug)]
pub struct PgmParser {}

impl PgmParser {
    /// Everything up to the next `\n`; a trailing `\r` is dropped, any other one is kept.
    fn raw_line(input: &str) -> IResult<&str, &str, PgmParserError> {
        let (remaining_input, line) =
            terminated::<_, _, _, PgmParserError, _, _>(take_till(|c: char| c == '\n'), opt(char('\n')))(input)?;

        Ok((remaining_input, line.strip_suffix('\r').unwrap_or(line)))
    }

    fn dimensions(line: &str) -> IResult<&str, (u32, u32), PgmParserError> {
        all_consuming(delimited(
            space0,
            separated_pair(u32_parser, space1, u32_parser),
            space0,
        ))(line)
    }

    fn max_value(line: &str) -> IResult<&str, u32, PgmParserError> {
        all_consuming(delimited(space0, u32_parser, space0))(line)
    }

    /// Leading whitespace (any amount, including line breaks) and the token after it.
    fn sample_token(input: &str) -> IResult<&str, (&str, &str), PgmParserError> {
        pair(
            take_while(|c: char| c.is_whitespace()),
            take_till1(|c: char| c.is_whitespace()),
        )(input)
    }

    fn next_line(input: &str, missing: PgmParserError) -> Result<(&str, &str), PgmParserError> {
        if input.is_empty() {
            return Err(missing);
        }

        let (remaining_input, line) = PgmParser::raw_line(input)?;

        Ok((remaining_input, line))
    }

    fn tag_line(input: &str) -> Result<&str, PgmParserError> {
        let (remaining_input, line) = PgmParser::next_line(input, PgmParserError::MissingTag)?;

        let tag = line.trim_end();
        if tag != GRAYSCALE_ASCII_TAG {
            return Err(PgmParserError::UnsupportedTag(tag.to_string()));
        }

        Ok(remaining_input)
    }

    fn dimension_line(input: &str) -> Result<(&str, (usize, usize)), PgmParserError> {
        let (remaining_input, line) =
            PgmParser::next_line(input, PgmParserError::MissingDimensions)?;
        let invalid = || PgmParserError::InvalidDimensions(line.to_string());

        let (_, (columns, rows)) = PgmParser::dimensions(line).map_err(|_| invalid())?;

        if columns == 0 || rows == 0 {
            return Err(invalid());
        }

        let (columns, rows) = (columns as usize, rows as usize);
        columns.checked_mul(rows).ok_or_else(invalid)?;

        Ok((remaining_input, (columns, rows)))
    }

    fn max_value_line(input: &str) -> Result<(&str, u16), PgmParserError> {
        let (remaining_input, line) = PgmParser::next_line(input, PgmParserError::MissingMaxValue)?;
        let invalid = || PgmParserError::InvalidMaxValue(line.to_string());

        let (_, max_value) = PgmParser::max_value(line).map_err(|_| invalid())?;

        match u16::try_from(max_value) {
            Ok(val) if val > 0 => Ok((remaining_input, val)),
            _ => Err(invalid()),
        }
    }

    fn sample_value(token: &str, line: usize) -> Result<u16, PgmParserError> {
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PgmParserError::InvalidSample {
                token: token.to_string(),
                line,
            });
        }

        // only digits left, so a failed parse means the value is too large
        token
            .parse::<u16>()
            .map_err(|_| PgmParserError::SampleOutOfRange {
                token: token.to_string(),
                line,
            })
    }

    /// Reads exactly `expected` samples. Line breaks carry no meaning here, the
    /// caller folds the flat list into rows by the declared column count.
    fn samples(input: &str, expected: usize) -> Result<Vec<u16>, PgmParserError> {
        let mut data: Vec<u16> = Vec::with_capacity(expected.min(input.len() / 2 + 1));
        let mut input = input;
        let mut line = HEADER_LINES + 1;

        loop {
            match PgmParser::sample_token(input) {
                Err(nom::Err::Error(_)) => break, // nothing but whitespace left
                Err(err) => return Err(err.into()),
                Ok((remaining_input, (whitespace, token))) => {
                    input = remaining_input;
                    line += whitespace.matches('\n').count();

                    if data.len() == expected {
                        return Err(PgmParserError::TooManySamples { expected, line });
                    }

                    data.push(PgmParser::sample_value(token, line)?);
                }
            }
        }

        if data.len() < expected {
            return Err(PgmParserError::MissingSamples {
                expected,
                found: data.len(),
            });
        }

        Ok(data)
    }

    /// Parses an ASCII grayscale PGM (`P2`).
    ///
    /// Samples fill the grid column by column; whenever the column index wraps
    /// past the declared column count the row index advances. The resulting
    /// grid is therefore row-major with `columns` samples per row.
    pub fn parse(i: &str) -> Result<HeightGrid, PgmParserError> {
        let input = PgmParser::tag_line(i)?;
        let (input, _comment) = PgmParser::next_line(input, PgmParserError::MissingComment)?;
        let (input, (columns, rows)) = PgmParser::dimension_line(input)?;
        let (input, max_value) = PgmParser::max_value_line(input)?;

        let data = PgmParser::samples(input, columns * rows)?;

        Ok(HeightGrid::new(columns, rows, max_value, data))
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<HeightGrid, PgmParserError> {
        let text = std::str::from_utf8(bytes).map_err(|_| PgmParserError::NotText)?;

        PgmParser::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PgmParser, PgmParserError};

    #[test]
    fn parses_square_grid_row_major() {
        let grid = PgmParser::parse("P2\n# made by hand\n2 2\n255\n10 20 30 40\n").unwrap();

        assert_eq!((2, 2), grid.dimensions());
        assert_eq!(255, grid.get_max_value());
        assert_eq!(&[10, 20], grid.row(0));
        assert_eq!(&[30, 40], grid.row(1));
    }

    #[test]
    fn parses_non_square_grid_with_columns_first() {
        let grid = PgmParser::parse("P2\n# 3 columns, 2 rows\n3 2\n65535\n1 2 3 4 5 6\n").unwrap();

        assert_eq!((3, 2), grid.dimensions());
        assert_eq!(&[1, 2, 3], grid.row(0));
        assert_eq!(&[4, 5, 6], grid.row(1));
        assert_eq!(6, grid.sample(2, 1));
    }

    #[test]
    fn sample_stream_ignores_line_breaks() {
        let aligned = PgmParser::parse("P2\n#\n3 2\n9\n1 2 3\n4 5 6\n").unwrap();
        let ragged = PgmParser::parse("P2\n#\n3 2\n9\n1\n\n2   3 4\n\t5\n6").unwrap();

        assert_eq!(aligned, ragged);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let grid = PgmParser::parse("P2\r\n# windows\r\n2 1\r\n255\r\n7 8\r\n").unwrap();

        assert_eq!(&[7, 8], grid.row(0));
    }

    #[test]
    fn comment_line_may_contain_carriage_returns() {
        let grid = PgmParser::parse("P2\n# made\rby hand\n1 1\n255\n7\n").unwrap();

        assert_eq!(&[7], grid.row(0));
    }

    #[test]
    fn stray_carriage_return_in_dimensions_is_reported() {
        assert_eq!(
            Err(PgmParserError::InvalidDimensions("1\r1".to_string())),
            PgmParser::parse("P2\n#\n1\r1\n255\n7\n")
        );
    }

    #[test]
    fn comment_line_is_never_interpreted() {
        let grid = PgmParser::parse("P2\n3 3\n1 1\n255\n42\n").unwrap();

        assert_eq!((1, 1), grid.dimensions());
        assert_eq!(42, grid.sample(0, 0));
    }

    #[test]
    fn max_value_is_not_enforced_against_samples() {
        let grid = PgmParser::parse("P2\n#\n2 1\n255\n256 65535\n").unwrap();

        assert_eq!(&[256, 65535], grid.row(0));
    }

    #[rstest]
    #[case("P5")]
    #[case("P1")]
    #[case("P3")]
    #[case("p2")]
    fn rejects_other_tags(#[case] tag: &str) {
        let input = format!("{}\n#\n1 1\n255\n0\n", tag);

        assert_eq!(
            Err(PgmParserError::UnsupportedTag(tag.to_string())),
            PgmParser::parse(&input)
        );
    }

    #[rstest]
    #[case("2")]
    #[case("2 2 2")]
    #[case("0 2")]
    #[case("2 0")]
    #[case("-1 2")]
    #[case("two 2")]
    fn rejects_invalid_dimension_lines(#[case] dimensions: &str) {
        let input = format!("P2\n#\n{}\n255\n1 2 3 4\n", dimensions);

        assert_eq!(
            Err(PgmParserError::InvalidDimensions(dimensions.to_string())),
            PgmParser::parse(&input)
        );
    }

    #[rstest]
    #[case("0")]
    #[case("65536")]
    #[case("max")]
    fn rejects_invalid_max_values(#[case] max_value: &str) {
        let input = format!("P2\n#\n1 1\n{}\n1\n", max_value);

        assert_eq!(
            Err(PgmParserError::InvalidMaxValue(max_value.to_string())),
            PgmParser::parse(&input)
        );
    }

    #[test]
    fn reports_missing_header_lines() {
        assert_eq!(Err(PgmParserError::MissingTag), PgmParser::parse(""));
        assert_eq!(Err(PgmParserError::MissingComment), PgmParser::parse("P2\n"));
        assert_eq!(Err(PgmParserError::MissingDimensions), PgmParser::parse("P2\n#\n"));
        assert_eq!(Err(PgmParserError::MissingMaxValue), PgmParser::parse("P2\n#\n1 1\n"));
    }

    #[test]
    fn rejects_too_few_samples() {
        assert_eq!(
            Err(PgmParserError::MissingSamples {
                expected: 4,
                found: 3
            }),
            PgmParser::parse("P2\n#\n2 2\n255\n10 20 30\n")
        );
    }

    #[test]
    fn rejects_too_many_samples() {
        assert_eq!(
            Err(PgmParserError::TooManySamples {
                expected: 4,
                line: 6
            }),
            PgmParser::parse("P2\n#\n2 2\n255\n10 20 30 40\n50\n")
        );
    }

    #[test]
    fn reports_line_of_invalid_sample() {
        assert_eq!(
            Err(PgmParserError::InvalidSample {
                token: "3x".to_string(),
                line: 7
            }),
            PgmParser::parse("P2\n#\n2 2\n255\n1 2\n\n3x 4\n")
        );
    }

    #[test]
    fn rejects_negative_samples() {
        assert!(matches!(
            PgmParser::parse("P2\n#\n1 1\n255\n-1\n"),
            Err(PgmParserError::InvalidSample { .. })
        ));
    }

    #[test]
    fn rejects_samples_above_16_bit() {
        assert_eq!(
            Err(PgmParserError::SampleOutOfRange {
                token: "65536".to_string(),
                line: 5
            }),
            PgmParser::parse("P2\n#\n1 1\n65535\n65536\n")
        );
    }

    #[test]
    fn rejects_non_text_input() {
        assert_eq!(
            Err(PgmParserError::NotText),
            PgmParser::parse_bytes(&[b'P', b'5', b'\n', 0xff, 0xfe])
        );
    }
}
