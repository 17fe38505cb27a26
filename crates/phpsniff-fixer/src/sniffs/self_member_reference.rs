//! `Foo::` inside class `Foo` becomes `self::`

use phpsniff_core::{helpers, TokenKind};

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

pub struct SelfMemberReferenceSniff;

impl Sniff for SelfMemberReferenceSniff {
    fn code(&self) -> &'static str {
        "Squiz.Classes.SelfMemberReference"
    }

    fn description(&self) -> &'static str {
        "Static references to the enclosing class must use self::"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::DoubleColon]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();

        let Some(class) = helpers::enclosing_class(stream, ptr) else {
            return Ok(());
        };
        // Anonymous classes have no name to compare against
        let Some(class_name) = stream.declaration_name(class) else {
            return Ok(());
        };
        // Code inside a closure may be rebound to another class
        let closure = stream[ptr].conditions.iter().any(|&(owner, kind)| {
            kind == TokenKind::Function && owner > class && stream.declaration_name(owner).is_none()
        });
        if closure {
            return Ok(());
        }

        let Some(name) = ptr.checked_sub(1).and_then(|p| stream.find_previous_non_empty(p)) else {
            return Ok(());
        };
        let referenced = &stream[name].text;
        let is_local = match stream[name].kind {
            TokenKind::String => referenced.eq_ignore_ascii_case(class_name),
            TokenKind::NameFullyQualified => {
                let qualified = match helpers::namespace_of(stream, class) {
                    Some(namespace) => format!("\\{}\\{}", namespace, class_name),
                    None => format!("\\{}", class_name),
                };
                referenced.eq_ignore_ascii_case(&qualified)
            }
            _ => false,
        };
        if !is_local {
            return Ok(());
        }

        if file.add_fixable_error(
            "Must use \"self::\" for local static member reference",
            name,
            "NotUsed",
        ) {
            file.fixer().replace(name, "self")?;
        }
        Ok(())
    }
}
