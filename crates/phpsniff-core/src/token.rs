//! Token kinds and the token record shared by every layer

use serde::Serialize;

macro_rules! token_kinds {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Closed set of token categories produced by the tokenizer
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum TokenKind {
            $($(#[$doc])* $variant,)*
        }

        impl TokenKind {
            /// Every kind, in declaration order
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant,)*];

            /// Conventional `T_*` name, used in reports and token dumps
            pub fn name(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $name,)*
                }
            }
        }
    };
}

token_kinds! {
    // Outside PHP code
    /// Text outside `<?php ... ?>`
    InlineHtml => "T_INLINE_HTML",
    /// `<?php` plus at most one trailing whitespace character
    OpenTag => "T_OPEN_TAG",
    /// `<?=`
    OpenTagWithEcho => "T_OPEN_TAG_WITH_ECHO",
    /// `?>` plus at most one trailing line break
    CloseTag => "T_CLOSE_TAG",

    // Trivia
    Whitespace => "T_WHITESPACE",
    /// `//`, `#` and `/* */` comments
    Comment => "T_COMMENT",
    DocCommentOpenTag => "T_DOC_COMMENT_OPEN_TAG",
    DocCommentCloseTag => "T_DOC_COMMENT_CLOSE_TAG",
    DocCommentStar => "T_DOC_COMMENT_STAR",
    DocCommentWhitespace => "T_DOC_COMMENT_WHITESPACE",
    DocCommentString => "T_DOC_COMMENT_STRING",
    /// `@param`, `@return`, ...
    DocCommentTag => "T_DOC_COMMENT_TAG",

    // Names and literals
    Variable => "T_VARIABLE",
    /// Unqualified identifier
    String => "T_STRING",
    NameQualified => "T_NAME_QUALIFIED",
    NameFullyQualified => "T_NAME_FULLY_QUALIFIED",
    NameRelative => "T_NAME_RELATIVE",
    LNumber => "T_LNUMBER",
    DNumber => "T_DNUMBER",
    /// Single-quoted string, or double-quoted without interpolation
    ConstantEncapsedString => "T_CONSTANT_ENCAPSED_STRING",
    /// Double-quoted string containing `$var` or `{$expr}`
    DoubleQuotedString => "T_DOUBLE_QUOTED_STRING",
    /// Backtick shell command, kept whole
    Backtick => "T_BACKTICK",
    StartHeredoc => "T_START_HEREDOC",
    Heredoc => "T_HEREDOC",
    EndHeredoc => "T_END_HEREDOC",
    StartNowdoc => "T_START_NOWDOC",
    Nowdoc => "T_NOWDOC",
    EndNowdoc => "T_END_NOWDOC",
    /// `__LINE__`, `__CLASS__`, ...
    MagicConstant => "T_MAGIC_CONSTANT",
    /// `(int)`, `(string)`, ...
    Cast => "T_CAST",

    // Keywords
    Abstract => "T_ABSTRACT",
    Array => "T_ARRAY",
    As => "T_AS",
    Break => "T_BREAK",
    Callable => "T_CALLABLE",
    Case => "T_CASE",
    Catch => "T_CATCH",
    Class => "T_CLASS",
    Clone => "T_CLONE",
    Const => "T_CONST",
    Continue => "T_CONTINUE",
    Declare => "T_DECLARE",
    Default => "T_DEFAULT",
    Do => "T_DO",
    Echo => "T_ECHO",
    Else => "T_ELSE",
    Elseif => "T_ELSEIF",
    Empty => "T_EMPTY",
    Enddeclare => "T_ENDDECLARE",
    Endfor => "T_ENDFOR",
    Endforeach => "T_ENDFOREACH",
    Endif => "T_ENDIF",
    Endswitch => "T_ENDSWITCH",
    Endwhile => "T_ENDWHILE",
    Enum => "T_ENUM",
    Eval => "T_EVAL",
    /// `exit` and `die`
    Exit => "T_EXIT",
    Extends => "T_EXTENDS",
    False => "T_FALSE",
    Final => "T_FINAL",
    Finally => "T_FINALLY",
    Fn => "T_FN",
    For => "T_FOR",
    Foreach => "T_FOREACH",
    Function => "T_FUNCTION",
    Global => "T_GLOBAL",
    Goto => "T_GOTO",
    If => "T_IF",
    Implements => "T_IMPLEMENTS",
    Include => "T_INCLUDE",
    IncludeOnce => "T_INCLUDE_ONCE",
    Instanceof => "T_INSTANCEOF",
    Insteadof => "T_INSTEADOF",
    Interface => "T_INTERFACE",
    Isset => "T_ISSET",
    List => "T_LIST",
    LogicalAnd => "T_LOGICAL_AND",
    LogicalOr => "T_LOGICAL_OR",
    LogicalXor => "T_LOGICAL_XOR",
    Match => "T_MATCH",
    Namespace => "T_NAMESPACE",
    New => "T_NEW",
    Null => "T_NULL",
    Parent => "T_PARENT",
    Print => "T_PRINT",
    Private => "T_PRIVATE",
    Protected => "T_PROTECTED",
    Public => "T_PUBLIC",
    Readonly => "T_READONLY",
    Require => "T_REQUIRE",
    RequireOnce => "T_REQUIRE_ONCE",
    Return => "T_RETURN",
    SelfKeyword => "T_SELF",
    Static => "T_STATIC",
    Switch => "T_SWITCH",
    Throw => "T_THROW",
    Trait => "T_TRAIT",
    True => "T_TRUE",
    Try => "T_TRY",
    Unset => "T_UNSET",
    Use => "T_USE",
    Var => "T_VAR",
    While => "T_WHILE",
    Yield => "T_YIELD",

    // Brackets
    OpenParenthesis => "T_OPEN_PARENTHESIS",
    CloseParenthesis => "T_CLOSE_PARENTHESIS",
    OpenSquareBracket => "T_OPEN_SQUARE_BRACKET",
    CloseSquareBracket => "T_CLOSE_SQUARE_BRACKET",
    OpenCurlyBracket => "T_OPEN_CURLY_BRACKET",
    CloseCurlyBracket => "T_CLOSE_CURLY_BRACKET",
    /// `#[`, closed by `]`
    AttributeStart => "T_ATTRIBUTE",

    // Punctuation
    Semicolon => "T_SEMICOLON",
    Comma => "T_COMMA",
    Colon => "T_COLON",
    DoubleColon => "T_DOUBLE_COLON",
    ObjectOperator => "T_OBJECT_OPERATOR",
    NullsafeObjectOperator => "T_NULLSAFE_OBJECT_OPERATOR",
    DoubleArrow => "T_DOUBLE_ARROW",
    NsSeparator => "T_NS_SEPARATOR",
    Ellipsis => "T_ELLIPSIS",
    Dollar => "T_DOLLAR",
    At => "T_ASPERAND",
    InlineThen => "T_INLINE_THEN",
    Coalesce => "T_COALESCE",

    // Assignment
    Equal => "T_EQUAL",
    PlusEqual => "T_PLUS_EQUAL",
    MinusEqual => "T_MINUS_EQUAL",
    MulEqual => "T_MUL_EQUAL",
    DivEqual => "T_DIV_EQUAL",
    ConcatEqual => "T_CONCAT_EQUAL",
    ModEqual => "T_MOD_EQUAL",
    PowEqual => "T_POW_EQUAL",
    AndEqual => "T_AND_EQUAL",
    OrEqual => "T_OR_EQUAL",
    XorEqual => "T_XOR_EQUAL",
    SlEqual => "T_SL_EQUAL",
    SrEqual => "T_SR_EQUAL",
    CoalesceEqual => "T_COALESCE_EQUAL",

    // Comparison
    IsEqual => "T_IS_EQUAL",
    IsNotEqual => "T_IS_NOT_EQUAL",
    IsIdentical => "T_IS_IDENTICAL",
    IsNotIdentical => "T_IS_NOT_IDENTICAL",
    LessThan => "T_LESS_THAN",
    GreaterThan => "T_GREATER_THAN",
    IsSmallerOrEqual => "T_IS_SMALLER_OR_EQUAL",
    IsGreaterOrEqual => "T_IS_GREATER_OR_EQUAL",
    Spaceship => "T_SPACESHIP",

    // Arithmetic, logic, bits
    Plus => "T_PLUS",
    Minus => "T_MINUS",
    Multiply => "T_MULTIPLY",
    Divide => "T_DIVIDE",
    Modulus => "T_MODULUS",
    Pow => "T_POW",
    Inc => "T_INC",
    Dec => "T_DEC",
    StringConcat => "T_STRING_CONCAT",
    BooleanAnd => "T_BOOLEAN_AND",
    BooleanOr => "T_BOOLEAN_OR",
    BooleanNot => "T_BOOLEAN_NOT",
    BitwiseAnd => "T_BITWISE_AND",
    BitwiseOr => "T_BITWISE_OR",
    BitwiseXor => "T_BITWISE_XOR",
    BitwiseNot => "T_BITWISE_NOT",
    Sl => "T_SL",
    Sr => "T_SR",

    /// Anything the tokenizer could not classify, including unterminated literals
    Unknown => "T_UNKNOWN",
}

/// Whitespace and every comment kind; the usual skip set for navigation
pub const EMPTY_TOKENS: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Comment,
    TokenKind::DocCommentOpenTag,
    TokenKind::DocCommentCloseTag,
    TokenKind::DocCommentStar,
    TokenKind::DocCommentWhitespace,
    TokenKind::DocCommentString,
    TokenKind::DocCommentTag,
];

pub const COMMENT_TOKENS: &[TokenKind] = &[
    TokenKind::Comment,
    TokenKind::DocCommentOpenTag,
    TokenKind::DocCommentCloseTag,
    TokenKind::DocCommentStar,
    TokenKind::DocCommentWhitespace,
    TokenKind::DocCommentString,
    TokenKind::DocCommentTag,
];

/// Kinds that can own a brace-delimited scope
pub const SCOPE_OWNERS: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Enum,
    TokenKind::Function,
    TokenKind::If,
    TokenKind::Elseif,
    TokenKind::Else,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::Switch,
    TokenKind::Try,
    TokenKind::Catch,
    TokenKind::Finally,
    TokenKind::Match,
    TokenKind::Namespace,
    TokenKind::Declare,
];

/// Class-like declarations
pub const OO_SCOPE_OWNERS: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Enum,
];

/// Kinds that end a statement
pub const STATEMENT_END: &[TokenKind] = &[
    TokenKind::Semicolon,
    TokenKind::CloseTag,
];

impl TokenKind {
    /// Whitespace or any comment
    pub fn is_empty(self) -> bool {
        EMPTY_TOKENS.contains(&self)
    }

    pub fn is_comment(self) -> bool {
        COMMENT_TOKENS.contains(&self)
    }

    /// Reserved words, including `true`, `false`, `null`, `self` and `parent`
    pub fn is_keyword(self) -> bool {
        (TokenKind::Abstract..=TokenKind::Yield).contains(&self)
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParenthesis
                | TokenKind::OpenSquareBracket
                | TokenKind::OpenCurlyBracket
                | TokenKind::AttributeStart
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParenthesis | TokenKind::CloseSquareBracket | TokenKind::CloseCurlyBracket
        )
    }

    /// Any identifier-like name token
    pub fn is_name(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::NameQualified
                | TokenKind::NameFullyQualified
                | TokenKind::NameRelative
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a reserved word, case-insensitively
pub fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "abstract" => TokenKind::Abstract,
        "and" => TokenKind::LogicalAnd,
        "array" => TokenKind::Array,
        "as" => TokenKind::As,
        "break" => TokenKind::Break,
        "callable" => TokenKind::Callable,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "clone" => TokenKind::Clone,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "declare" => TokenKind::Declare,
        "default" => TokenKind::Default,
        "die" | "exit" => TokenKind::Exit,
        "do" => TokenKind::Do,
        "echo" => TokenKind::Echo,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::Elseif,
        "empty" => TokenKind::Empty,
        "enddeclare" => TokenKind::Enddeclare,
        "endfor" => TokenKind::Endfor,
        "endforeach" => TokenKind::Endforeach,
        "endif" => TokenKind::Endif,
        "endswitch" => TokenKind::Endswitch,
        "endwhile" => TokenKind::Endwhile,
        "enum" => TokenKind::Enum,
        "eval" => TokenKind::Eval,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "final" => TokenKind::Final,
        "finally" => TokenKind::Finally,
        "fn" => TokenKind::Fn,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "function" => TokenKind::Function,
        "global" => TokenKind::Global,
        "goto" => TokenKind::Goto,
        "if" => TokenKind::If,
        "implements" => TokenKind::Implements,
        "include" => TokenKind::Include,
        "include_once" => TokenKind::IncludeOnce,
        "instanceof" => TokenKind::Instanceof,
        "insteadof" => TokenKind::Insteadof,
        "interface" => TokenKind::Interface,
        "isset" => TokenKind::Isset,
        "list" => TokenKind::List,
        "match" => TokenKind::Match,
        "namespace" => TokenKind::Namespace,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "or" => TokenKind::LogicalOr,
        "parent" => TokenKind::Parent,
        "print" => TokenKind::Print,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "readonly" => TokenKind::Readonly,
        "require" => TokenKind::Require,
        "require_once" => TokenKind::RequireOnce,
        "return" => TokenKind::Return,
        "self" => TokenKind::SelfKeyword,
        "static" => TokenKind::Static,
        "switch" => TokenKind::Switch,
        "throw" => TokenKind::Throw,
        "trait" => TokenKind::Trait,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "unset" => TokenKind::Unset,
        "use" => TokenKind::Use,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        "xor" => TokenKind::LogicalXor,
        "yield" => TokenKind::Yield,
        "__line__" | "__file__" | "__dir__" | "__class__" | "__trait__" | "__method__"
        | "__function__" | "__namespace__" | "__property__" => TokenKind::MagicConstant,
        _ => return None,
    };
    Some(kind)
}

/// One lexeme of the source plus the structural links computed by the indexer
///
/// Everything below `offset` is derived data owned by the round that produced
/// it; none of it survives re-tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text; concatenating all tokens reproduces the source
    pub text: String,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character, counted in characters
    pub column: usize,
    /// Bracket/brace depth before this token
    pub level: usize,
    /// Byte offset of the first character
    pub offset: usize,

    /// Matching bracket, when the pair is well formed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<usize>,
    /// `{` of the body, set on scope owners and on the braces themselves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_opener: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_closer: Option<usize>,
    /// Owner of a scope brace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_condition: Option<usize>,
    /// Keyword owning a parenthesis pair (`function`, `if`, `array`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parenthesis_owner: Option<usize>,
    /// Close tag of a doc comment, set on its open tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_closer: Option<usize>,
    /// `@tag` tokens of a doc comment, in order, set on its open tag
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comment_tags: Vec<usize>,
    /// Enclosing scope owners, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<(usize, TokenKind)>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            level: 0,
            offset,
            partner: None,
            scope_opener: None,
            scope_closer: None,
            scope_condition: None,
            parenthesis_owner: None,
            comment_closer: None,
            comment_tags: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Byte offset just past the token
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }
}
