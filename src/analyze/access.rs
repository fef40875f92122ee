//! Member-access recognition for dotted chains such as `CryptoJS.enc.Utf8.parse(data)`.
//!
//! Each line is scanned for maximal chains rooted at an uppercase identifier. A chain is
//! classified by what follows it and by its shape, in priority order:
//!
//! 1. static method call: `Base.[ns.]*Class.method(` with an uppercase `Class`, unless a
//!    namespace segment between `Base` and `Class` is reserved (`enc`, `mode`, `pad`)
//! 2. constructor call: `new Base.[ns.]*Name(`
//! 3. method call: `Base.[ns.]*member(`
//! 4. property access: any other chain, unless it is the parent path of a call recorded
//!    on the same line
//!
//! Only chains whose base is bound by an import of the same file are recorded.

use crate::types::{AccessContext, MemberAccess, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CHAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-zA-Z0-9]*)((?:\.[a-zA-Z0-9_]+)+)").unwrap());

static CLASS_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());

#[derive(Debug)]
struct Chain<'a> {
    base: &'a str,
    full_path: &'a str,
    is_call: bool,
    after_new: bool,
}

fn find_chains(line: &str) -> Vec<Chain<'_>> {
    let mut chains = Vec::new();

    for cap in CHAIN_PATTERN.captures_iter(line) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        let prefix = &line[..whole.start()];

        // `this.Foo.bar`: Foo is a member here, not an identifier in scope
        if prefix.ends_with('.') {
            continue;
        }

        let rest = line[whole.end()..].trim_start();
        chains.push(Chain {
            base: cap.get(1).map(|m| m.as_str()).unwrap_or(""),
            full_path: whole.as_str(),
            is_call: rest.starts_with('('),
            after_new: preceded_by_new(prefix),
        });
    }

    chains
}

fn preceded_by_new(prefix: &str) -> bool {
    match prefix.trim_end().strip_suffix("new") {
        Some(before) => !before
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.'),
        None => false,
    }
}

fn classify(chain: &Chain<'_>, reserved: &HashSet<String>) -> MemberAccess {
    let segments: Vec<&str> = chain.full_path.split('.').collect();
    let member = segments.last().copied().unwrap_or("");

    if !chain.is_call {
        return MemberAccess::new(
            chain.base,
            chain.full_path,
            member,
            AccessContext::PropertyAccess,
        );
    }

    if segments.len() >= 3 {
        let class_idx = segments.len() - 2;
        let class_name = segments[class_idx];
        let through_reserved = segments[1..class_idx]
            .iter()
            .any(|seg| reserved.contains(*seg));

        if CLASS_SEGMENT.is_match(class_name) && !through_reserved {
            return MemberAccess::static_call(chain.base, chain.full_path, member, class_name);
        }
    }

    let context = if chain.after_new {
        AccessContext::ConstructorCall
    } else {
        AccessContext::MethodCall
    };
    MemberAccess::new(chain.base, chain.full_path, member, context)
}

fn priority(context: AccessContext) -> u8 {
    match context {
        AccessContext::StaticMethodCall => 3,
        AccessContext::ConstructorCall => 2,
        AccessContext::MethodCall => 1,
        _ => 0,
    }
}

fn is_call(context: AccessContext) -> bool {
    priority(context) > 0
}

/// Record the member accesses of one trimmed line into `result`
pub fn scan_member_accesses(line: &str, reserved: &HashSet<String>, result: &mut ParseResult) {
    let mut found: Vec<MemberAccess> = Vec::new();

    for chain in find_chains(line) {
        if result.binding_for(chain.base).is_none() {
            continue;
        }

        let access = classify(&chain, reserved);

        // Same text span twice on one line: keep the strongest classification
        match found.iter_mut().find(|a| a.full_path == access.full_path) {
            Some(existing) => {
                if priority(access.context) > priority(existing.context) {
                    *existing = access;
                }
            }
            None => found.push(access),
        }
    }

    let call_paths: HashSet<&str> = found
        .iter()
        .filter(|a| is_call(a.context))
        .map(|a| a.full_path.as_str())
        .collect();

    let mut accepted = Vec::with_capacity(found.len());
    for access in &found {
        if access.context == AccessContext::PropertyAccess {
            let prefix = format!("{}.", access.full_path);
            if call_paths.iter().any(|call| call.starts_with(&prefix)) {
                continue;
            }
        }

        match access.context {
            AccessContext::StaticMethodCall => tracing::trace!(
                "Found static method call: {} on class {}",
                access.full_path,
                access.class_name.as_deref().unwrap_or("")
            ),
            AccessContext::PropertyAccess => {
                tracing::trace!("Found property access: {}", access.full_path)
            }
            _ => tracing::trace!("Found call: {}", access.full_path),
        }
        accepted.push(access.clone());
    }

    result.member_accesses.extend(accepted);
}
