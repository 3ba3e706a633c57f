use lfg_protocol::{Features, TokenId, TokenRecord, Upos};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map, map_res, opt, rest},
    multi::separated_list1,
    sequence::{preceded, separated_pair, tuple},
    IResult,
};

use crate::line::{Line, RawId};
use crate::ParseError;

/// CoNLL-U has exactly ten columns per word line.
pub const COLUMNS: usize = 10;

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// `7`, `7-8` or `7.1`
pub fn raw_id(input: &str) -> IResult<&str, RawId> {
    alt((
        map(separated_pair(number, char('-'), number), |(a, b)| RawId::Range(a, b)),
        map(separated_pair(number, char('.'), number), |(a, b)| RawId::Empty(a, b)),
        map(number, RawId::Word),
    ))(input)
}

fn feature(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(|c: char| c == '=' || c == '|'),
        char('='),
        take_till1(|c: char| c == '|'),
    )(input)
}

/// `Case=Nom|Gender=Masc|Number=Sing`
pub fn features(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    separated_list1(char('|'), feature)(input)
}

/// `# sent_id = train-s1`
pub fn comment(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    preceded(
        tuple((char('#'), space0)),
        tuple((take_till(|c: char| c == '='), opt(preceded(char('='), rest)))),
    )(input)
}

fn column_error(line: usize, column: &'static str, value: &str) -> ParseError {
    ParseError::Column {
        line,
        column,
        value: value.to_string(),
    }
}

/// Classifies one line. `line_no` is 1-based and only used for errors.
pub fn parse_line(line_no: usize, text: &str) -> Result<Line<'_>, ParseError> {
    let text = text.trim_end_matches('\r');

    if text.trim().is_empty() {
        return Ok(Line::Blank);
    }

    if text.starts_with('#') {
        let (key, value) = match comment(text) {
            Ok((_, (key, value))) => (key.trim(), value.map(str::trim)),
            Err(_) => (text[1..].trim(), None),
        };
        return Ok(Line::Comment { key, value });
    }

    let columns: Vec<&str> = text.split('\t').collect();
    if columns.len() != COLUMNS {
        return Err(ParseError::ColumnCount {
            line: line_no,
            found: columns.len(),
        });
    }

    let id = match all_consuming(raw_id)(columns[0]) {
        Ok((_, RawId::Word(id))) => id,
        // Ranges and empty nodes sit outside the basic dependency tree
        Ok((_, other)) => return Ok(Line::Skipped(other)),
        Err(_) => return Err(column_error(line_no, "ID", columns[0])),
    };

    let upos = columns[3]
        .parse::<Upos>()
        .map_err(|source| ParseError::Upos { line: line_no, source })?;

    let feats = match columns[5] {
        "_" => None,
        raw => {
            let (_, pairs) = all_consuming(features)(raw)
                .map_err(|_| column_error(line_no, "FEATS", raw))?;
            Some(pairs.into_iter().collect::<Features>())
        }
    };

    let (_, head) = all_consuming(number)(columns[6])
        .map_err(|_| column_error(line_no, "HEAD", columns[6]))?;

    let deprel = columns[7];
    if deprel.is_empty() || deprel == "_" {
        return Err(column_error(line_no, "DEPREL", deprel));
    }

    Ok(Line::Word(TokenRecord {
        id: TokenId(id),
        form: columns[1].to_string(),
        lemma: columns[2].to_string(),
        upos,
        feats,
        head: TokenId(head),
        deprel: deprel.to_string(),
    }))
}
