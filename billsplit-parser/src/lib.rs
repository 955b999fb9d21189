#![warn(clippy::uninlined_format_args)]

mod i18n;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_till1, take_until, take_while1},
    character::complete::{char, digit1, multispace1, satisfy},
    combinator::{not, opt, recognize, value, verify},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitKeyword {
    #[default]
    Equal,
    Proportional,
}

/// A name after `->`, optionally weighted as `name:weight`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient<'a> {
    pub name: &'a str,
    pub weight: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients<'a> {
    Everyone,
    Listed(Vec<Recipient<'a>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine<'a> {
    pub name: &'a str,
    /// Raw amount text without the currency sign, e.g. `"1,234.50"`.
    pub price: &'a str,
    pub recipients: Option<Recipients<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxValue<'a> {
    Percent(&'a str),
    Amount(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    People(Vec<&'a str>),
    Item(ItemLine<'a>),
    Tip {
        percent: &'a str,
        split: SplitKeyword,
    },
    Tax {
        value: TaxValue<'a>,
        split: SplitKeyword,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '\'' | '&')
}

fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(word), not(satisfy(is_name_char)))
}

fn name(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till1(|c| c == '"'), char('"')),
        take_while1(is_name_char),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize((digit1, opt((char('.'), digit1)))).parse(input)
}

// 12, 12.5, $1,234.56
fn price(input: &str) -> IResult<&str, &str> {
    preceded(
        opt(char('$')),
        verify(
            take_while1(|c: char| c.is_ascii_digit() || c == '.' || c == ','),
            |text: &str| text.chars().any(|c| c.is_ascii_digit()),
        ),
    )
    .parse(input)
}

fn percent(input: &str) -> IResult<&str, &str> {
    terminated(number, (sp, char('%'))).parse(input)
}

fn split_keyword(input: &str) -> IResult<&str, SplitKeyword> {
    alt((
        value(SplitKeyword::Proportional, keyword("proportional")),
        value(SplitKeyword::Equal, keyword("equal")),
    ))
    .parse(input)
}

fn split_suffix(input: &str) -> IResult<&str, SplitKeyword> {
    opt(preceded(sp, split_keyword))
        .map(Option::unwrap_or_default)
        .parse(input)
}

fn list_separator(input: &str) -> IResult<&str, char> {
    delimited(sp, char(','), sp).parse(input)
}

// people: Alice, Bob, "Mary Ann"
fn people(input: &str) -> IResult<&str, Statement<'_>> {
    (
        keyword("people"),
        sp,
        char(':'),
        sp,
        separated_list1(list_separator, name),
    )
        .map(|(_, _, _, _, names)| Statement::People(names))
        .parse(input)
}

// tip 18% proportional
fn tip(input: &str) -> IResult<&str, Statement<'_>> {
    (keyword("tip"), sp, percent, split_suffix)
        .map(|(_, _, percent, split)| Statement::Tip { percent, split })
        .parse(input)
}

// tax 8.25% equal | tax $2.40 proportional
fn tax(input: &str) -> IResult<&str, Statement<'_>> {
    let tax_value = alt((
        percent.map(TaxValue::Percent),
        preceded(char('$'), price).map(TaxValue::Amount),
    ));
    (keyword("tax"), sp, tax_value, split_suffix)
        .map(|(_, _, value, split)| Statement::Tax { value, split })
        .parse(input)
}

fn recipient(input: &str) -> IResult<&str, Recipient<'_>> {
    (name, opt(preceded((sp, char(':'), sp), number)))
        .map(|(name, weight)| Recipient { name, weight })
        .parse(input)
}

fn recipients(input: &str) -> IResult<&str, Recipients<'_>> {
    alt((
        value(
            Recipients::Everyone,
            alt((keyword("everyone"), tag("*"))),
        ),
        separated_list1(list_separator, recipient).map(Recipients::Listed),
    ))
    .parse(input)
}

// {name} {price} [-> {recipients}]
fn item(input: &str) -> IResult<&str, Statement<'_>> {
    (
        name,
        sp,
        price,
        opt(preceded((sp, tag("->"), sp), recipients)),
    )
        .map(|(name, _, price, recipients)| {
            Statement::Item(ItemLine {
                name,
                price,
                recipients,
            })
        })
        .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((people, tip, tax, item)).parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

/// Parses a bill script, one statement per line.
pub fn parse_program<'a>(input: &'a str) -> Result<Program<'a>, ParseError> {
    let mut statements = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: idx + 1,
            detail: i18n::syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }
        match statement_with_sp(rest) {
            Ok((rest, stmt)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: i18n::syntax_error_unparsed_detail(rest.trim()),
                    });
                }
                statements.push(StatementWithLine {
                    line: idx + 1,
                    statement: stmt,
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: i18n::syntax_error_detail(e),
                });
            }
        }
    }

    Ok(Program { statements })
}
