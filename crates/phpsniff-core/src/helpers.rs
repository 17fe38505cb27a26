//! Queries built on top of the navigator that several rules share

use crate::stream::TokenStream;
use crate::token::{TokenKind, OO_SCOPE_OWNERS};

/// Tokens that may sit between a doc comment and the declaration it documents
const DECLARATION_PREFIX: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
    TokenKind::Static,
    TokenKind::Readonly,
    TokenKind::Var,
];

/// Namespace in effect at `index`, `None` in the global namespace
pub fn namespace_of(stream: &TokenStream, index: usize) -> Option<String> {
    let mut from = index.checked_sub(1)?;
    loop {
        let ns = stream.find_previous(&[TokenKind::Namespace], from, None, false)?;
        let name = stream
            .find_next_non_empty(ns + 1)
            .filter(|&n| matches!(stream[n].kind, TokenKind::String | TokenKind::NameQualified));

        // `namespace\foo()` is a relative name, not a declaration
        let is_declaration = stream.find_next_non_empty(ns + 1).map_or(false, |n| {
            matches!(
                stream[n].kind,
                TokenKind::String | TokenKind::NameQualified | TokenKind::OpenCurlyBracket
            )
        });

        if is_declaration && stream[ns].level == 0 {
            if let Some(closer) = stream[ns].scope_closer {
                if index > closer {
                    // Braced namespace that already ended
                    return None;
                }
            }
            return name.map(|n| stream[n].text.clone());
        }

        from = ns.checked_sub(1)?;
    }
}

/// Doc comment open tag documenting the declaration at `declaration`
///
/// Modifiers and attributes between the comment and the keyword are skipped.
pub fn find_doc_block(stream: &TokenStream, declaration: usize) -> Option<usize> {
    let mut i = declaration.checked_sub(1)?;
    loop {
        let token = stream.get(i)?;
        match token.kind {
            TokenKind::DocCommentCloseTag => {
                return stream.find_previous(&[TokenKind::DocCommentOpenTag], i, None, false);
            }
            TokenKind::CloseSquareBracket => {
                // Skip over `#[...]`
                let opener = token.partner?;
                if stream[opener].kind != TokenKind::AttributeStart {
                    return None;
                }
                i = opener;
            }
            kind if DECLARATION_PREFIX.contains(&kind) => {}
            _ => return None,
        }
        i = i.checked_sub(1)?;
    }
}

/// Innermost class, interface, trait or enum enclosing `index`
pub fn enclosing_class(stream: &TokenStream, index: usize) -> Option<usize> {
    stream
        .get(index)?
        .conditions
        .iter()
        .rev()
        .find(|(_, kind)| OO_SCOPE_OWNERS.contains(kind))
        .map(|(owner, _)| *owner)
}

/// Text following a doc comment tag on the same line
pub fn tag_content(stream: &TokenStream, tag: usize) -> Option<usize> {
    let line = stream.get(tag)?.line;
    let next = tag + 1;
    let content = if stream.get(next)?.kind == TokenKind::DocCommentWhitespace {
        next + 1
    } else {
        next
    };
    stream
        .get(content)
        .filter(|t| t.kind == TokenKind::DocCommentString && t.line == line)
        .map(|_| content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(stream: &TokenStream, text: &str) -> usize {
        stream.iter().position(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_namespace_of() {
        let stream = TokenStream::parse("<?php\nnamespace App\\Model;\n\nclass User {}\n");
        let class = index_of(&stream, "class");
        assert_eq!(namespace_of(&stream, class).as_deref(), Some("App\\Model"));
    }

    #[test]
    fn test_global_namespace() {
        let stream = TokenStream::parse("<?php\nclass User {}\n");
        let class = index_of(&stream, "class");
        assert_eq!(namespace_of(&stream, class), None);
    }

    #[test]
    fn test_braced_namespaces() {
        let stream = TokenStream::parse("<?php namespace A { class X {} } namespace B { class Y {} }");
        let x = index_of(&stream, "X");
        let y = index_of(&stream, "Y");
        assert_eq!(namespace_of(&stream, x).as_deref(), Some("A"));
        assert_eq!(namespace_of(&stream, y).as_deref(), Some("B"));
    }

    #[test]
    fn test_find_doc_block() {
        let source = "<?php\nclass A {\n    /**\n     * Does things\n     */\n    #[Pure]\n    public static function f() {}\n\n    function g() {}\n}\n";
        let stream = TokenStream::parse(source);
        let f = index_of(&stream, "f");
        let function = stream.find_previous(&[TokenKind::Function], f, None, false).unwrap();

        let doc = find_doc_block(&stream, function).unwrap();
        assert_eq!(stream[doc].kind, TokenKind::DocCommentOpenTag);
        assert_eq!(stream[doc].line, 3);

        let g = index_of(&stream, "g");
        let function = stream.find_previous(&[TokenKind::Function], g, None, false).unwrap();
        assert_eq!(find_doc_block(&stream, function), None);
    }

    #[test]
    fn test_find_doc_block_out_of_range() {
        let stream = TokenStream::parse("<?php /** x */ function f() {}");
        assert_eq!(find_doc_block(&stream, stream.len() + 5), None);
        assert_eq!(find_doc_block(&stream, 0), None);
    }

    #[test]
    fn test_enclosing_class() {
        let stream = TokenStream::parse("<?php trait T { function f() { return 1; } } function g() { return 2; }");
        let trait_ = index_of(&stream, "trait");
        let one = index_of(&stream, "1");
        let two = index_of(&stream, "2");
        assert_eq!(enclosing_class(&stream, one), Some(trait_));
        assert_eq!(enclosing_class(&stream, two), None);
    }

    #[test]
    fn test_tag_content() {
        let stream = TokenStream::parse("<?php\n/**\n * @param int $x\n * @deprecated\n */\n");
        let tags: Vec<usize> = stream
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::DocCommentTag)
            .map(|(i, _)| i)
            .collect();

        let param = tag_content(&stream, tags[0]).unwrap();
        assert_eq!(stream[param].text, "int $x");
        assert_eq!(tag_content(&stream, tags[1]), None);
    }
}
