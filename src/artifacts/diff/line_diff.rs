//! Line-level diff and three-way merge
//!
//! This is the default byte-level oracle behind the [`DiffOracle`] seam: an
//! LCS-anchored line diff and a diff3-style chunk merge. Both are pure
//! functions of their inputs, so identical inputs always produce identical
//! output.
//!
//! [`DiffOracle`]: crate::artifacts::diff::DiffOracle

use std::collections::HashMap;
use std::path::Path;

pub const CONFLICT_OURS_MARKER: &str = "<<<<<<< HEAD";
pub const CONFLICT_SEPARATOR: &str = "=======";
pub const CONFLICT_THEIRS_MARKER: &str = ">>>>>>> MERGE_HEAD";

pub struct MergeResult {
    pub content: Vec<u8>,
    pub conflicted: bool,
}

/// Split into lines, keeping the terminator on each line
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.split_inclusive(|byte| *byte == b'\n').collect()
}

/// Longest-common-subsequence matches between two line lists
///
/// Returns matched index pairs, strictly increasing on both sides.
fn lcs_pairs(a: &[&[u8]], b: &[&[u8]]) -> Vec<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    // table[i][j] = LCS length of a[i..] and b[j..], flattened
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    pairs
}

fn push_line(out: &mut Vec<u8>, prefix: u8, line: &[u8]) {
    out.push(prefix);
    out.extend_from_slice(line);
    if !line.ends_with(b"\n") {
        out.push(b'\n');
    }
}

/// Render a full-context, unified-style diff of two byte buffers
pub fn unified_diff(from: &[u8], to: &[u8], path: &Path) -> Vec<u8> {
    let a = split_lines(from);
    let b = split_lines(to);
    let pairs = lcs_pairs(&a, &b);

    let mut out = Vec::new();
    out.extend_from_slice(
        format!("--- a/{0}\n+++ b/{0}\n", path.display()).as_bytes(),
    );

    let sentinel = (a.len(), b.len());
    let (mut i, mut j) = (0, 0);
    for (mi, mj) in pairs.iter().copied().chain(std::iter::once(sentinel)) {
        while i < mi {
            push_line(&mut out, b'-', a[i]);
            i += 1;
        }
        while j < mj {
            push_line(&mut out, b'+', b[j]);
            j += 1;
        }
        if mi < a.len() {
            push_line(&mut out, b' ', a[i]);
            i += 1;
            j += 1;
        }
    }

    out
}

/// Three-way merge keyed on divergence from a common base
///
/// Chunks where only one side diverged take that side; chunks where both
/// sides made the same change collapse; anything else becomes a
/// conflict-marked region with ours on top and theirs below.
pub fn merge_three_way(base: &[u8], ours: &[u8], theirs: &[u8]) -> MergeResult {
    let b = split_lines(base);
    let o = split_lines(ours);
    let t = split_lines(theirs);

    let match_ours: HashMap<usize, usize> = lcs_pairs(&b, &o).into_iter().collect();
    let match_theirs: HashMap<usize, usize> = lcs_pairs(&b, &t).into_iter().collect();

    let mut out = Vec::new();
    let mut conflicted = false;
    let (mut bi, mut oi, mut ti) = (0usize, 0usize, 0usize);

    loop {
        // stable position: the current base line survives on both sides
        if bi < b.len() && match_ours.get(&bi) == Some(&oi) && match_theirs.get(&bi) == Some(&ti)
        {
            out.extend_from_slice(b[bi]);
            bi += 1;
            oi += 1;
            ti += 1;
            continue;
        }

        if bi >= b.len() && oi >= o.len() && ti >= t.len() {
            break;
        }

        let (nbi, noi, nti) = next_anchor(bi, oi, ti, &match_ours, &match_theirs, &b, &o, &t);
        let base_chunk = concat(&b[bi..nbi]);
        let ours_chunk = concat(&o[oi..noi]);
        let theirs_chunk = concat(&t[ti..nti]);

        if ours_chunk == base_chunk {
            out.extend_from_slice(&theirs_chunk);
        } else if theirs_chunk == base_chunk || ours_chunk == theirs_chunk {
            out.extend_from_slice(&ours_chunk);
        } else {
            conflicted = true;
            out.extend_from_slice(CONFLICT_OURS_MARKER.as_bytes());
            out.push(b'\n');
            push_chunk_terminated(&mut out, &ours_chunk);
            out.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
            out.push(b'\n');
            push_chunk_terminated(&mut out, &theirs_chunk);
            out.extend_from_slice(CONFLICT_THEIRS_MARKER.as_bytes());
            out.push(b'\n');
        }

        bi = nbi;
        oi = noi;
        ti = nti;
    }

    MergeResult {
        content: out,
        conflicted,
    }
}

/// Next base index matched in both sides at or after the current cursors
///
/// LCS matches are monotonic, so the first qualifying base index closes the
/// current unstable chunk on all three sequences. No such index means the
/// chunk runs to the end.
#[allow(clippy::too_many_arguments)]
fn next_anchor(
    bi: usize,
    oi: usize,
    ti: usize,
    match_ours: &HashMap<usize, usize>,
    match_theirs: &HashMap<usize, usize>,
    b: &[&[u8]],
    o: &[&[u8]],
    t: &[&[u8]],
) -> (usize, usize, usize) {
    for k in bi..b.len() {
        if let (Some(&ko), Some(&kt)) = (match_ours.get(&k), match_theirs.get(&k))
            && ko >= oi
            && kt >= ti
        {
            return (k, ko, kt);
        }
    }

    (b.len(), o.len(), t.len())
}

fn concat(lines: &[&[u8]]) -> Vec<u8> {
    lines.concat()
}

fn push_chunk_terminated(out: &mut Vec<u8>, chunk: &[u8]) {
    out.extend_from_slice(chunk);
    if !chunk.is_empty() && !chunk.ends_with(b"\n") {
        out.push(b'\n');
    }
}
