// Parser for signature records.
//
// Parses a token stream (from the lexer) into a `RawSignature`:
//
//   record  := base IDENT '(' args? ')'
//   args    := arg (',' arg)*
//   arg     := 'data'? type
//   type    := functor | base
//   base    := IDENT ('[' ','* ']')?
//   functor := '(' args ')' '=>' base
//
// A parenthesized functor type (which itself contains commas) is one atomic
// argument. Uses chumsky combinators.
//
// Preconditions: input is one complete record from `reader` (continuation
//   lines already rejoined).
// Postconditions: returns a `RawSignature` plus any parse errors (non-fatal
//   here; fatal at the pipeline level).
// Failure modes: missing separators or unbalanced paren/bracket nesting
//   produce `Rich` diagnostics.
// Side effects: none.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::ast::{RawArg, RawSignature, RawType};
use crate::lexer::Token;

/// Result of parsing: structural signature plus any errors.
#[derive(Debug)]
pub struct ParseResult {
    pub signature: Option<RawSignature>,
    pub errors: Vec<Rich<'static, Token, SimpleSpan>>,
}

/// Parse one signature record. Lexes then parses.
///
/// Returns a `RawSignature` (if parsing succeeded) plus any errors.
pub fn parse(source: &str) -> ParseResult {
    let lex_result = crate::lexer::lex(source);
    let len = source.len();

    // Convert lexer output to chumsky stream.
    let token_iter = lex_result.tokens.into_iter().map(|(tok, span)| {
        let cspan: SimpleSpan = (span.start..span.end).into();
        (tok, cspan)
    });
    let eoi: SimpleSpan = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let parser = record_parser(source);
    let (signature, parse_errors) = parser.parse(stream).into_output_errors();

    // Merge lex errors + parse errors.
    let mut all_errors: Vec<Rich<'static, Token, SimpleSpan>> = lex_result
        .errors
        .into_iter()
        .map(|e| {
            let span: SimpleSpan = (e.span.start..e.span.end).into();
            Rich::custom(span, e.message)
        })
        .collect();
    all_errors.extend(parse_errors.into_iter().map(|e| e.into_owned()));

    ParseResult {
        signature,
        errors: all_errors,
    }
}

// ── Record parser builder ──
//
// All grammar rules are built inside `record_parser` so that the `source`
// reference is captured once and shared by all combinators.

fn record_parser<'tokens, 'src: 'tokens, I>(
    source: &'src str,
) -> impl Parser<'tokens, I, RawSignature, extra::Err<Rich<'tokens, Token, SimpleSpan>>> + 'src
where
    'tokens: 'src,
    I: ValueInput<'tokens, Token = Token, Span = SimpleSpan>,
{
    // ── Identifier ──

    let ident = just(Token::Ident).map_with(move |_, e| {
        let span: SimpleSpan = e.span();
        source[span.start()..span.end()].to_string()
    });

    // ── Array suffix: '[' ','* ']', depth = commas + 1 ──

    let depth = just(Token::LBracket)
        .ignore_then(just(Token::Comma).repeated().collect::<Vec<_>>())
        .then_ignore(just(Token::RBracket))
        .try_map(|commas, span| {
            let d = commas.len() + 1;
            if d <= 9 {
                Ok(d as u8)
            } else {
                Err(Rich::custom(span, "array nesting deeper than 9"))
            }
        })
        .or_not()
        .map(|d| d.unwrap_or(0));

    let base_type = ident
        .clone()
        .then(depth)
        .map(|(name, depth)| RawType::Base { name, depth });

    // ── Type: functor | base ──

    let raw_type = recursive(|raw_type| {
        let inner_arg = just(Token::Data)
            .or_not()
            .then(raw_type)
            .map(|(data, ty)| RawArg {
                data: data.is_some(),
                ty,
            });

        let functor = inner_arg
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .then_ignore(just(Token::Arrow))
            .then(base_type.clone())
            .map(|(args, ret)| RawType::Functor {
                args,
                ret: Box::new(ret),
            });

        functor.or(base_type.clone())
    });

    // ── Argument ──

    let arg = just(Token::Data)
        .or_not()
        .then(raw_type)
        .map(|(data, ty)| RawArg {
            data: data.is_some(),
            ty,
        });

    // ── Record ──

    base_type
        .then(ident)
        .then(
            arg.separated_by(just(Token::Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        )
        .map(|((return_type, name), args)| RawSignature {
            return_type,
            name,
            args,
        })
}

// ── Tests ──
