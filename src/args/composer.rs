//! Argument composer: merges collected dependencies into a spark-submit command line.

use crate::args::registry::{flag_registry, Channel, FlagDef, SUBMIT_PROGRAM};
use crate::collect::DependencyLists;

/// Rewrite `args` in place into a `spark-submit` invocation.
///
/// For every dependency flag already on the command line, the flag and its
/// value are pulled out and the value is kept in front of the collected
/// paths. Slot 0 becomes `spark-submit`. The merged lists are then inserted
/// right after slot 0 as `--py-files`, `--files`, `--archives`, each only
/// when its value is non-empty.
pub fn compose(args: &mut Vec<String>, deps: &DependencyLists) {
    let registry = flag_registry();

    let merged: Vec<(&FlagDef, String)> = registry
        .iter()
        .map(|def| {
            let external = take_flag(args, def);
            let value = join_values(external.as_deref(), entries(deps, def.channel));
            (def, value)
        })
        .collect();

    match args.first_mut() {
        Some(slot) => *slot = SUBMIT_PROGRAM.to_string(),
        None => args.push(SUBMIT_PROGRAM.to_string()),
    }

    // Insert last-to-first at slot 1 so the registry order is preserved.
    for (def, value) in merged.into_iter().rev() {
        if value.is_empty() {
            continue;
        }
        args.insert(1, value);
        args.insert(1, def.long.to_string());
    }
}

/// Remove the first occurrence of `def` (after slot 0) and return its value.
///
/// The token following a bare flag is always taken as its value. A bare flag
/// in last position has an empty value.
fn take_flag(args: &mut Vec<String>, def: &FlagDef) -> Option<String> {
    let (idx, inline) = args
        .iter()
        .enumerate()
        .skip(1)
        .find_map(|(i, arg)| def.matches(arg).map(|v| (i, v.map(String::from))))?;

    args.remove(idx);
    if let Some(value) = inline {
        return Some(value);
    }
    if idx < args.len() {
        Some(args.remove(idx))
    } else {
        Some(String::new())
    }
}

fn entries(deps: &DependencyLists, channel: Channel) -> &[String] {
    match channel {
        Channel::Code => &deps.code_files,
        Channel::Files => &deps.file_assets,
        Channel::Archives => &deps.archive_assets,
    }
}

/// Comma-join the external value and the collected entries, external first.
/// Empty segments are dropped.
fn join_values(external: Option<&str>, collected: &[String]) -> String {
    external
        .into_iter()
        .chain(collected.iter().map(String::as_str))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
