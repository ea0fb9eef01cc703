//! Small interaction networks shared by the core, provider, and CLI tests.
//!
//! Networks are plain label pairs so this crate stays independent of
//! `robust-core`; callers feed them to `Network::from_edges`.

use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

/// Five-vertex path `a-b-c-d-e`.
pub const PATH: &[(&str, &str)] = &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")];

/// Two components, `a-b-c` and `x-y-z`, with no path between them.
pub const DISJOINT_PAIRS: &[(&str, &str)] = &[("a", "b"), ("b", "c"), ("x", "y"), ("y", "z")];

/// Square `s-u-t-v-s` with a pendant `t-w`: two equally short routes join
/// `s` and `t`.
pub const DIAMOND: &[(&str, &str)] = &[("s", "u"), ("u", "t"), ("s", "v"), ("v", "t"), ("t", "w")];

/// Ladder with `rungs` rungs: rails `l0..` and `r0..`, each rung `li-ri`.
///
/// # Examples
/// ```
/// use robust_test_support::fixtures::ladder;
///
/// let edges = ladder(3);
/// // 2 rails of 2 edges each, plus 3 rungs
/// assert_eq!(edges.len(), 7);
/// ```
#[must_use]
pub fn ladder(rungs: usize) -> Vec<(String, String)> {
    let mut edges = Vec::with_capacity(rungs * 3);
    for rung in 0..rungs {
        edges.push((format!("l{rung}"), format!("r{rung}")));
        if rung > 0 {
            let previous = rung - 1;
            edges.push((format!("l{previous}"), format!("l{rung}")));
            edges.push((format!("r{previous}"), format!("r{rung}")));
        }
    }
    edges
}

/// Writes `edges` as a tab-separated edge list with a header row.
///
/// # Errors
/// Propagates any I/O error raised while creating or writing the file.
pub fn write_edge_list<L>(dir: &Path, name: &str, edges: &[(L, L)]) -> io::Result<PathBuf>
where
    L: AsRef<str>,
{
    let path = dir.join(name);
    let mut file = fs::File::create(&path)?;
    writeln!(file, "source\ttarget")?;
    for (left, right) in edges {
        writeln!(file, "{}\t{}", left.as_ref(), right.as_ref())?;
    }
    Ok(path)
}

/// Writes one seed label per line.
///
/// # Errors
/// Propagates any I/O error raised while creating or writing the file.
pub fn write_seeds(dir: &Path, name: &str, seeds: &[&str]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, seeds.join("\n") + "\n")?;
    Ok(path)
}
