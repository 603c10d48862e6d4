//! Fuzz target for suppression directive parsing and fix application.
//!
//! Both operate on arbitrary source text and user-supplied regexes, so they
//! must never panic.

#![no_main]

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

use skimguard_domain::{apply_fix, parse_suppression, CommentSyntax, SuppressionRecord};
use skimguard_types::{FixConfig, FixKind};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    text: String,
    inline: String,
    prefix: String,
    suffix: String,
    search: String,
    replace: String,
    supported: bool,
    today: i32,
}

fuzz_target!(|input: FuzzInput| {
    let syntax = CommentSyntax {
        inline: &input.inline,
        prefix: &input.prefix,
        suffix: &input.suffix,
    };

    for line in input.text.lines().take(50) {
        if let Some(s) = parse_suppression(line, syntax) {
            if let Some(ids) = &s.rule_ids {
                assert!(ids.iter().all(|id| !id.is_empty()));
            }
        }
    }

    let today = NaiveDate::from_num_days_from_ce_opt(input.today.rem_euclid(1_000_000))
        .unwrap_or(NaiveDate::MIN);
    let record = SuppressionRecord::scan(&input.text, Some(syntax), today);
    if record.suppress_all {
        assert!(record.is_suppressed("anything"));
    }

    if input.search.len() > 200 {
        return;
    }
    let fix = FixConfig {
        kind: if input.supported {
            FixKind::RegexReplace
        } else {
            FixKind::Unsupported
        },
        name: String::new(),
        search: input.search,
        replace: input.replace,
    };
    let result = apply_fix(&input.text, &fix);
    if !input.supported {
        assert!(result.is_err());
    }
});
