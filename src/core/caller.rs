//! Caller resolution
//!
//! Walks the call stack of the logging call in progress and reports the
//! nearest frame that does not belong to this crate, so records point at
//! the code that asked for them rather than at the facade itself.
//!
//! The crate's own identity is discovered once, by walking the stack from
//! inside the resolver until the resolver finds itself. A frame belongs to
//! this crate when its symbol name is qualified with the crate's package or
//! when its source file lies under the crate's `src/` directory. Optimized
//! builds often resolve only short names (`emit`, `capture`) from debug
//! info, so the source path carries ownership there. A caller frame without
//! file and line information is not reported.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Upper bound on frames inspected per resolution.
pub const MAXIMUM_CALLER_DEPTH: usize = 25;

/// Name fragment of the function performing self-identification.
const SELF_MARKER: &str = "caller::identify_self";

// Unqualified name of the same function, as optimized debug info reports it.
const SELF_SHORT_NAME: &str = "identify_self";

static SELF_IDENTITY: OnceCell<SelfIdentity> = OnceCell::new();

// Reports the last frame inside this crate instead of the first frame
// outside it. Only unit tests of this crate flip it.
static REPORT_CALLER_IN_OWN_PACKAGE: AtomicBool = AtomicBool::new(false);

/// Source location of the code that invoked a logging method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl CallerFrame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// `path:line`, the value of the `file` key.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

#[derive(Debug)]
struct SelfIdentity {
    package: String,
    source_root: PathBuf,
    // Frames belonging to the stack walker itself that precede our code.
    minimum_depth: usize,
}

impl SelfIdentity {
    fn new(package: impl Into<String>, minimum_depth: usize) -> Self {
        Self {
            package: package.into(),
            source_root: Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
            minimum_depth,
        }
    }

    fn owns(&self, symbol: &SymbolFrame) -> bool {
        let by_name = symbol
            .function
            .as_deref()
            .is_some_and(|function| package_name(function) == self.package);
        let by_file = symbol
            .file
            .as_deref()
            .is_some_and(|file| Path::new(file).starts_with(&self.source_root));
        by_name || by_file
    }
}

#[derive(Debug)]
struct SymbolFrame {
    function: Option<String>,
    file: Option<String>,
    line: Option<u32>,
}

impl SymbolFrame {
    fn is_unresolved(&self) -> bool {
        self.function.is_none() && self.file.is_none()
    }

    /// `None` unless both file and line are known.
    fn into_caller(self) -> Option<CallerFrame> {
        Some(CallerFrame {
            file: self.file?,
            line: self.line?,
            function: self.function.unwrap_or_default(),
        })
    }
}

/// Package identifier of a fully qualified function name.
///
/// Everything up to, but not including, the first `.` (or `::`) that occurs
/// after the last `/`. Without a `/` the search starts at the beginning;
/// without a separator the whole name is the package. Leading `<` and `&`
/// from trait-impl symbols such as `<crate::Type as Trait>::method` are
/// ignored.
///
/// ```
/// use rust_log_facade::core::caller::package_name;
///
/// assert_eq!(package_name("pkg.sub/repo.Type.method"), "pkg.sub/repo");
/// assert_eq!(package_name("simplepkg.Function"), "simplepkg");
/// assert_eq!(package_name("my_crate::module::function"), "my_crate");
/// ```
pub fn package_name(function: &str) -> &str {
    let name = function.trim_start_matches(['<', '&']);
    let start = name.rfind('/').map_or(0, |i| i + 1);
    let rest = &name[start..];

    let end = [rest.find('.'), rest.find("::")].into_iter().flatten().min();
    match end {
        Some(i) => &name[..start + i],
        None => name,
    }
}

/// Package identifier this crate resolved for itself.
pub fn facade_package() -> &'static str {
    &SELF_IDENTITY.get_or_init(identify_self).package
}

/// Nearest frame outside this crate, or `None` when the bounded window
/// holds no such frame or the frame has no line information. Never fails.
#[inline(never)]
pub fn resolve_caller() -> Option<CallerFrame> {
    let identity = SELF_IDENTITY.get_or_init(identify_self);
    walk(identity)
}

#[cfg(test)]
pub(crate) fn set_report_caller_in_own_package(enabled: bool) {
    REPORT_CALLER_IN_OWN_PACKAGE.store(enabled, Ordering::Relaxed);
}

fn is_self_marker(function: &str) -> bool {
    function.contains(SELF_MARKER) || function == SELF_SHORT_NAME
}

#[inline(never)]
fn identify_self() -> SelfIdentity {
    let frames = capture(MAXIMUM_CALLER_DEPTH);
    let anchor = identify_self as usize;

    for (depth, frame) in frames.iter().enumerate() {
        let resolved = symbols(frame);
        let named = resolved
            .iter()
            .filter_map(|symbol| symbol.function.as_deref())
            .any(is_self_marker);
        if !named && frame.symbol_address() as usize != anchor {
            continue;
        }

        // Short names carry no package; fall back to the build-time one.
        let package = resolved
            .iter()
            .filter_map(|symbol| symbol.function.as_deref())
            .find(|function| function.contains("::"))
            .map_or(env!("CARGO_CRATE_NAME"), package_name);
        return SelfIdentity::new(package, depth);
    }

    SelfIdentity::new(env!("CARGO_CRATE_NAME"), 0)
}

#[inline(never)]
fn walk(identity: &SelfIdentity) -> Option<CallerFrame> {
    let frames = capture(identity.minimum_depth + MAXIMUM_CALLER_DEPTH);
    let report_own = REPORT_CALLER_IN_OWN_PACKAGE.load(Ordering::Relaxed);

    select_caller(
        frames.iter().skip(identity.minimum_depth).flat_map(symbols),
        identity,
        report_own,
    )
}

/// First symbol outside this crate that follows one of its own symbols.
fn select_caller<I>(symbols: I, identity: &SelfIdentity, report_own: bool) -> Option<CallerFrame>
where
    I: IntoIterator<Item = SymbolFrame>,
{
    let mut seen_self = false;
    let mut prev: Option<SymbolFrame> = None;

    for symbol in symbols {
        if symbol.is_unresolved() {
            continue;
        }

        if identity.owns(&symbol) {
            seen_self = true;
            prev = Some(symbol);
            continue;
        }

        // Frames of the stack walker that were not covered by the
        // minimum depth (e.g. inlining differences) precede our own.
        if !seen_self {
            continue;
        }

        let chosen = if report_own { prev } else { Some(symbol) };
        return chosen.and_then(SymbolFrame::into_caller);
    }

    None
}

#[inline(never)]
fn capture(limit: usize) -> Vec<backtrace::Frame> {
    let mut frames = Vec::with_capacity(limit);
    backtrace::trace(|frame| {
        frames.push(frame.clone());
        frames.len() < limit
    });
    frames
}

// One physical frame may expand to several inlined functions, innermost first.
fn symbols(frame: &backtrace::Frame) -> Vec<SymbolFrame> {
    let mut out = Vec::new();
    backtrace::resolve_frame(frame, |symbol| {
        out.push(SymbolFrame {
            function: symbol.name().map(|name| format!("{:#}", name)),
            file: symbol.filename().map(|path| path.display().to_string()),
            line: symbol.lineno(),
        });
    });
    out
}
