//! End-to-end tests of the round loop with purpose-built sniffs

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use phpsniff_core::{TokenKind, TokenStream};
use phpsniff_fixer::{
    run_file, CollisionPolicy, EngineConfig, FixerError, Outcome, Ruleset, Sniff, SniffFile,
    INVALID_INDEX_CODE,
};

fn fixing(max_rounds: usize) -> EngineConfig {
    EngineConfig {
        fix: true,
        max_rounds,
        ..Default::default()
    }
}

fn ruleset(sniffs: Vec<Arc<dyn Sniff>>) -> Ruleset {
    let mut ruleset = Ruleset::new();
    for sniff in sniffs {
        ruleset.register(sniff);
    }
    ruleset
}

/// Replaces the token at a fixed index
struct ReplaceAt {
    index: usize,
    text: &'static str,
}

impl Sniff for ReplaceAt {
    fn code(&self) -> &'static str {
        "Test.Engine.ReplaceAt"
    }

    fn description(&self) -> &'static str {
        "Replaces one token"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::OpenTag]
    }

    fn process(&self, file: &mut SniffFile<'_>, _ptr: usize) -> Result<(), FixerError> {
        if file.stream()[self.index].text == self.text {
            return Ok(());
        }
        if file.add_fixable_error("Wrong token", self.index, "Found") {
            file.fixer().replace(self.index, self.text)?;
        }
        Ok(())
    }
}

/// Renames every `foo` identifier
struct RenameFoo {
    code: &'static str,
    to: &'static str,
}

impl Sniff for RenameFoo {
    fn code(&self) -> &'static str {
        self.code
    }

    fn description(&self) -> &'static str {
        "Renames foo"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::String]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        if file.stream()[ptr].text != "foo" {
            return Ok(());
        }
        if file.add_fixable_error(format!("Rename to {}", self.to), ptr, "Found") {
            file.fixer().replace(ptr, self.to)?;
        }
        Ok(())
    }
}

/// Never satisfied: `$a` wants to be `$b` and `$b` wants to be `$a`
struct Toggle;

impl Sniff for Toggle {
    fn code(&self) -> &'static str {
        "Test.Engine.Toggle"
    }

    fn description(&self) -> &'static str {
        "Flips between two states"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::Variable]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let other = match file.stream()[ptr].text.as_str() {
            "$a" => "$b",
            "$b" => "$a",
            _ => return Ok(()),
        };
        if file.add_fixable_warning("Flip", ptr, "Flip") {
            file.fixer().replace(ptr, other)?;
        }
        Ok(())
    }
}

/// Renames `$b` to `$c`
struct RenameB;

impl Sniff for RenameB {
    fn code(&self) -> &'static str {
        "Test.Engine.RenameB"
    }

    fn description(&self) -> &'static str {
        "Renames $b"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::Variable]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        if file.stream()[ptr].text == "$b" && file.add_fixable_error("Rename", ptr, "Found") {
            file.fixer().replace(ptr, "$c")?;
        }
        Ok(())
    }
}

/// Wraps a statement's expression in parentheses, one changeset per statement
struct Parenthesize;

impl Sniff for Parenthesize {
    fn code(&self) -> &'static str {
        "Test.Engine.Parenthesize"
    }

    fn description(&self) -> &'static str {
        "Wraps expressions"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::Semicolon]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();
        let last = match stream.find_previous_non_empty(ptr - 1) {
            Some(last) if stream[last].kind != TokenKind::CloseParenthesis => last,
            _ => return Ok(()),
        };
        let first = stream.find_start_of_statement(last);

        if file.add_fixable_error("Wrap", first, "Found") {
            let fixer = file.fixer();
            fixer.begin_changeset();
            fixer.insert_before(first, "(")?;
            fixer.insert_after(last, ")")?;
            fixer.end_changeset()?;
        }
        Ok(())
    }
}

/// Stages an edit past the end of the stream
struct OutOfRange;

impl Sniff for OutOfRange {
    fn code(&self) -> &'static str {
        "Test.Engine.OutOfRange"
    }

    fn description(&self) -> &'static str {
        "Misbehaves"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::OpenTag]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        if file.add_fixable_error("Broken", ptr, "Found") {
            let len = file.stream().len();
            let fixer = file.fixer();
            fixer.begin_changeset();
            fixer.replace(ptr, "<?php /* half */ ")?;
            fixer.replace(len + 10, "boom")?;
            fixer.end_changeset()?;
        }
        Ok(())
    }
}

#[test]
fn replacement_lands_at_token_offset() {
    let source = "<?php $x = Foo::bar();";
    let stream = TokenStream::parse(source);
    assert_eq!(stream[5].text, "Foo");

    let ruleset = ruleset(vec![Arc::new(ReplaceAt { index: 5, text: "self" })]);
    let report = run_file(Path::new("a.php"), source, &ruleset, &fixing(5));

    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(report.source, "<?php $x = self::bar();");
    assert_eq!(report.fixed, 1);
    assert!(report.diagnostics.is_empty());

    let after = TokenStream::parse(&report.source);
    assert_eq!(after[5].text, "self");
    assert_eq!(after[5].offset, stream[5].offset);
    for i in (0..stream.len()).filter(|&i| i != 5) {
        assert_eq!(after[i].text, stream[i].text);
    }
}

#[test]
fn colliding_fixes_first_wins() {
    let ruleset = ruleset(vec![
        Arc::new(RenameFoo { code: "Test.Engine.First", to: "bar" }),
        Arc::new(RenameFoo { code: "Test.Engine.Second", to: "baz" }),
    ]);
    let report = run_file(Path::new("a.php"), "<?php foo();", &ruleset, &fixing(5));

    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(report.source, "<?php bar();");
    assert_eq!(report.fixed, 1);
    assert_eq!(report.rounds, 2);
}

#[test]
fn colliding_fixes_last_wins() {
    let ruleset = ruleset(vec![
        Arc::new(RenameFoo { code: "Test.Engine.First", to: "bar" }),
        Arc::new(RenameFoo { code: "Test.Engine.Second", to: "baz" }),
    ]);
    let config = EngineConfig {
        collision: CollisionPolicy::LastWins,
        ..fixing(5)
    };
    let report = run_file(Path::new("a.php"), "<?php foo();", &ruleset, &config);

    assert_eq!(report.source, "<?php baz();");
    assert_eq!(report.fixed, 1);
}

#[test]
fn rejected_changeset_applies_nothing() {
    let ruleset = ruleset(vec![Arc::new(RenameB), Arc::new(Parenthesize)]);

    // One round only: the wrap collides with the rename of $b and must not
    // leave a lone "(" behind
    let report = run_file(Path::new("a.php"), "<?php $a + $b;", &ruleset, &fixing(1));
    assert_eq!(report.outcome, Outcome::RoundCapReached);
    assert_eq!(report.source, "<?php $a + $c;");
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, "Test.Engine.Parenthesize.Found");

    // Given another round the wrap is recomputed against the new tokens
    let report = run_file(Path::new("a.php"), "<?php $a + $b;", &ruleset, &fixing(5));
    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(report.source, "<?php ($a + $c);");
}

#[test]
fn toggling_sniff_stops_at_round_cap() {
    let ruleset = ruleset(vec![Arc::new(Toggle)]);
    let report = run_file(Path::new("a.php"), "<?php echo $a;", &ruleset, &fixing(3));

    assert_eq!(report.outcome, Outcome::RoundCapReached);
    assert_eq!(report.rounds, 4);
    assert_eq!(report.fixed, 3);
    assert_eq!(report.source, "<?php echo $b;");
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].fixable);
}

#[test]
fn round_cap_bounds_work_for_any_cap() {
    let ruleset = ruleset(vec![Arc::new(Toggle)]);
    for cap in 1..=6 {
        let report = run_file(Path::new("a.php"), "<?php $a; $b;", &ruleset, &fixing(cap));
        assert_eq!(report.outcome, Outcome::RoundCapReached);
        assert_eq!(report.rounds, cap + 1);
        assert_eq!(report.fixed, cap * 2);
    }
}

#[test]
fn invalid_index_is_reported_and_isolated() {
    let codes: HashSet<String> = ["Generic.PHP.LowerCaseConstant".to_string()].into_iter().collect();
    let mut ruleset = Ruleset::standard().restrict(&codes).unwrap();
    ruleset.register(Arc::new(OutOfRange));

    let report = run_file(Path::new("a.php"), "<?php $a = TRUE;", &ruleset, &fixing(5));

    assert_eq!(report.source, "<?php $a = true;");
    assert_eq!(report.outcome, Outcome::Converged);
    let internal: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.code == INVALID_INDEX_CODE)
        .collect();
    assert_eq!(internal.len(), 1);
    assert!(internal[0].message.contains("Test.Engine.OutOfRange"));
}

#[test]
fn report_only_run_leaves_source_alone() {
    let source = "<?php\nIF (TRUE) { $a = ARRAY(1); }   \n";
    let config = EngineConfig::default();
    let report = run_file(Path::new("a.php"), source, &Ruleset::standard(), &config);

    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.fixed, 0);
    assert_eq!(report.source, source);
    assert_eq!(report.diagnostics.len(), 5);
    assert!(report.diagnostics.iter().all(|d| d.fixable));
}

#[test]
fn fixing_is_idempotent() {
    let source = "<?php\nnamespace App;\n\nCLASS Foo {   \n    /**\n     * @type int\n     */\n    const A = ARRAY(NULL, FALSE);\n\n    public function f() {\n\n    }\n\n    public function g() { return Foo::A; }\n}\n";
    let ruleset = Ruleset::standard();
    let config = fixing(5);

    let first = run_file(Path::new("a.php"), source, &ruleset, &config);
    assert_eq!(first.outcome, Outcome::Converged);
    assert!(first.fixed > 0);
    assert!(first.diagnostics.is_empty(), "{:?}", first.diagnostics);
    assert_eq!(
        first.source,
        "<?php\nnamespace App;\n\nclass Foo {\n    /**\n     * @var int\n     */\n    const A = [null, false];\n\n    public function f() {}\n\n    public function g() { return self::A; }\n}\n"
    );

    let second = run_file(Path::new("a.php"), &first.source, &ruleset, &config);
    assert_eq!(second.outcome, Outcome::Converged);
    assert_eq!(second.fixed, 0);
    assert_eq!(second.rounds, 1);
    assert_eq!(second.source, first.source);
}

#[test]
fn silent_codes_fix_without_reporting() {
    let config = EngineConfig {
        silent: ["Generic.PHP.LowerCaseConstant".to_string()].into_iter().collect(),
        ..fixing(5)
    };
    let source = "<?php $a = NULL; if ($a) {}";
    let report = run_file(Path::new("a.php"), source, &Ruleset::standard(), &config);
    assert_eq!(report.source, "<?php $a = null; if ($a) {}");
    assert!(report.diagnostics.is_empty());

    let report_only = EngineConfig { fix: false, ..config };
    let report = run_file(Path::new("a.php"), "<?php $a = NULL;", &Ruleset::standard(), &report_only);
    assert!(report.diagnostics.is_empty());
}

static MEMO_INITS: AtomicUsize = AtomicUsize::new(0);

struct FileFact(bool);

/// Uses a per-file memo while flipping variables every round
struct MemoToggle;

impl Sniff for MemoToggle {
    fn code(&self) -> &'static str {
        "Test.Engine.MemoToggle"
    }

    fn description(&self) -> &'static str {
        "Reads a memo each round"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::Variable]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let enabled = file
            .memo(|stream, _| {
                MEMO_INITS.fetch_add(1, Ordering::SeqCst);
                FileFact(stream.len() > 1)
            })
            .0;
        if enabled {
            Toggle.process(file, ptr)?;
        }
        Ok(())
    }
}

#[test]
fn memo_survives_rounds_but_not_files() {
    let ruleset = ruleset(vec![Arc::new(MemoToggle)]);

    let report = run_file(Path::new("a.php"), "<?php $a;", &ruleset, &fixing(3));
    assert_eq!(report.rounds, 4);
    assert_eq!(MEMO_INITS.load(Ordering::SeqCst), 1);

    run_file(Path::new("b.php"), "<?php $a;", &ruleset, &fixing(3));
    assert_eq!(MEMO_INITS.load(Ordering::SeqCst), 2);
}

#[test]
fn class_with_several_interfaces_is_analyzed() {
    let source = "<?php\nclass Foo implements A, B {\n    function f() { return Foo::X; }\n    function g() {\n    }\n}\n";
    let report = run_file(Path::new("a.php"), source, &Ruleset::standard(), &fixing(5));

    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(
        report.source,
        "<?php\nclass Foo implements A, B {\n    function f() { return self::X; }\n    function g() {}\n}\n"
    );
}
