//! Construction of the `@odata.context` annotation value.
//!
//! [`build`] is total: shapes it cannot render precisely fall through to a
//! plain path join instead of erroring, so a response can always carry
//! *some* context. Output length is measured in one pass over the inputs
//! and the result is written into a single pre-sized buffer; nothing here
//! re-concatenates per select/expand item.

use crate::query::{PathSegment, SelectExpandTree, SelectItem};

pub(crate) const METADATA_FRAGMENT: &str = "$metadata#";
pub(crate) const ENTITY_SUFFIX: &str = "/$entity";

/// Compute the context URL for a payload described by the given shape.
///
/// Tiers, first applicable wins:
/// 1. single entity-set path, no select/expand, no `$apply`;
/// 2. any other bare path, joined with `/` and `('key')` splicing;
/// 3. entity set with a flat (depth <= 1, duplicate-free) select/expand;
/// 4. joined path with the same flat select/expand;
/// 5. raw `/`-joined identifiers (total, deliberately imprecise).
pub fn build(
    service_root: &str,
    path: &[PathSegment],
    select_expand: Option<&SelectExpandTree>,
    has_apply: bool,
    suffix: Option<&str>,
) -> String {
    let suffix = suffix.unwrap_or("");
    let tree = select_expand.filter(|t| !t.is_empty());

    if !has_apply {
        match tree {
            None => return render_joined(service_root, path, None, suffix),
            Some(tree) => {
                if let Some(shape) = measure_flat(tree) {
                    return render_joined(service_root, path, Some((tree, shape)), suffix);
                }
            }
        }
    }

    render_fallback(service_root, path, suffix)
}

/// Byte length and rendering facts of a flat select/expand fragment, or
/// `None` when the tree is not flat enough for the precise tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlatShape {
    len: usize,
    wildcard: bool,
}

fn measure_flat(tree: &SelectExpandTree) -> Option<FlatShape> {
    let mut seen: Vec<&str> = Vec::with_capacity(tree.items.len());
    let mut wildcard = false;
    let mut selects = 0usize;
    let mut select_len = 0usize;
    let mut expands = 0usize;
    let mut expand_len = 0usize;

    for item in &tree.items {
        match item {
            SelectItem::Wildcard => wildcard = true,
            SelectItem::Path { name, nested } => {
                if nested.is_some() {
                    return None;
                }
                if seen.contains(&name.as_str()) {
                    return None;
                }
                seen.push(name);
                selects += 1;
                select_len += name.len();
            }
            SelectItem::Expand { navigation, nested } => {
                if nested.is_some() {
                    return None;
                }
                if seen.contains(&navigation.as_str()) {
                    return None;
                }
                seen.push(navigation);
                expands += 1;
                expand_len += navigation.len() + 2;
            }
        }
    }

    // A wildcard subsumes every select name; the rendered select list
    // collapses to a single `*`.
    let (select_parts, select_len) = if wildcard {
        (1, 1)
    } else {
        (selects, select_len)
    };
    let parts = select_parts + expands;
    debug_assert!(parts > 0, "non-empty tree must render at least one part");
    Some(FlatShape {
        len: 2 + select_len + expand_len + (parts - 1),
        wildcard,
    })
}

fn push_flat_fragment(out: &mut String, tree: &SelectExpandTree, wildcard: bool) {
    out.push('(');
    let mut first = true;
    if wildcard {
        out.push('*');
        first = false;
    } else {
        for item in &tree.items {
            if let SelectItem::Path { name, .. } = item {
                if !first {
                    out.push(',');
                }
                out.push_str(name);
                first = false;
            }
        }
    }
    for item in &tree.items {
        if let SelectItem::Expand { navigation, .. } = item {
            if !first {
                out.push(',');
            }
            out.push_str(navigation);
            out.push_str("()");
            first = false;
        }
    }
    out.push(')');
}

fn joined_path_len(path: &[PathSegment]) -> usize {
    let mut n = 0;
    let mut first = true;
    for segment in path {
        if segment.is_key() {
            // ('<key>') spliced straight onto the preceding segment.
            n += segment.identifier().len() + 4;
        } else {
            if !first {
                n += 1;
            }
            n += segment.identifier().len();
            first = false;
        }
    }
    n
}

fn push_joined_path(out: &mut String, path: &[PathSegment]) {
    let mut first = true;
    for segment in path {
        if segment.is_key() {
            out.push_str("('");
            out.push_str(segment.identifier());
            out.push_str("')");
        } else {
            if !first {
                out.push('/');
            }
            out.push_str(segment.identifier());
            first = false;
        }
    }
}

fn render_joined(
    service_root: &str,
    path: &[PathSegment],
    flat: Option<(&SelectExpandTree, FlatShape)>,
    suffix: &str,
) -> String {
    let slash = usize::from(!service_root.ends_with('/'));
    let fragment_len = flat.map_or(0, |(_, shape)| shape.len);
    let n = service_root.len()
        + slash
        + METADATA_FRAGMENT.len()
        + joined_path_len(path)
        + fragment_len
        + suffix.len();

    let mut out = String::with_capacity(n);
    out.push_str(service_root);
    if slash == 1 {
        out.push('/');
    }
    out.push_str(METADATA_FRAGMENT);
    push_joined_path(&mut out, path);
    if let Some((tree, shape)) = flat {
        push_flat_fragment(&mut out, tree, shape.wildcard);
    }
    out.push_str(suffix);
    debug_assert_eq!(out.len(), n);
    out
}

fn render_fallback(service_root: &str, path: &[PathSegment], suffix: &str) -> String {
    let slash = usize::from(!service_root.ends_with('/'));
    let mut n = service_root.len() + slash + METADATA_FRAGMENT.len() + suffix.len();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            n += 1;
        }
        n += segment.identifier().len();
    }

    let mut out = String::with_capacity(n);
    out.push_str(service_root);
    if slash == 1 {
        out.push('/');
    }
    out.push_str(METADATA_FRAGMENT);
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(segment.identifier());
    }
    out.push_str(suffix);
    debug_assert_eq!(out.len(), n);
    out
}
