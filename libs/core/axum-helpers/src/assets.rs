use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};

/// Error type for stylesheet compilation
#[derive(Debug, thiserror::Error)]
pub enum ScssError {
    #[error("SCSS compile error: {0}")]
    Compile(#[from] Box<grass::Error>),

    #[error("I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Compile-on-demand SCSS in front of static file serving.
///
/// A request for `<dir>/<name>.css` whose `<name>.scss` source exists under
/// the source root is compiled into the destination root (plus a
/// `<name>.css.map` source map) before static serving picks the file up.
/// Compilation runs synchronously in the request path and only when the
/// output is missing or older than its source.
#[derive(Clone)]
pub struct ScssCompiler {
    src: PathBuf,
    dest: PathBuf,
}

impl ScssCompiler {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }

    /// Compile the source behind a `.css` request path if the output is
    /// missing or stale. Returns the written path, or `None` when the
    /// request does not map to a known SCSS source.
    pub fn compile_if_stale(&self, request_path: &str) -> Result<Option<PathBuf>, ScssError> {
        let Some(rel) = css_rel_path(request_path) else {
            return Ok(None);
        };

        let source = self.src.join(&rel).with_extension("scss");
        if !source.is_file() {
            return Ok(None);
        }

        let output = self.dest.join(&rel);
        if is_fresh(&source, &output) {
            return Ok(Some(output));
        }

        let css = grass::from_path(&source, &grass::Options::default())?;

        let file_name = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let map_name = format!("{}.map", file_name);

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ScssError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let body = format!("{}\n/*# sourceMappingURL={} */\n", css.trim_end(), map_name);
        write_file(&output, body.as_bytes())?;

        // grass produces no mapping data, so the map is a valid v3 skeleton
        // that names the source file.
        let source_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let map = json!({
            "version": 3,
            "file": file_name,
            "sources": [source_name],
            "names": [],
            "mappings": "",
        });
        write_file(&output.with_file_name(&map_name), map.to_string().as_bytes())?;

        debug!("Compiled {} -> {}", source.display(), output.display());
        Ok(Some(output))
    }
}

/// Middleware running the compiler for every `GET *.css` request.
///
/// Failures are logged and the request falls through to static serving,
/// which then serves the previous output or misses entirely.
pub async fn compile_scss(
    State(compiler): State<ScssCompiler>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::GET {
        if let Err(e) = compiler.compile_if_stale(request.uri().path()) {
            error!("{}", e);
        }
    }
    next.run(request).await
}

/// Map a request path to a relative `.css` path, rejecting traversal.
fn css_rel_path(request_path: &str) -> Option<PathBuf> {
    if !request_path.ends_with(".css") {
        return None;
    }

    let rel = Path::new(request_path.trim_start_matches('/'));
    let safe = rel
        .components()
        .all(|part| matches!(part, Component::Normal(_)));
    if !safe || rel.as_os_str().is_empty() {
        return None;
    }

    Some(rel.to_path_buf())
}

fn is_fresh(source: &Path, output: &Path) -> bool {
    let (Ok(src_meta), Ok(out_meta)) = (source.metadata(), output.metadata()) else {
        return false;
    };
    match (src_meta.modified(), out_meta.modified()) {
        (Ok(src_time), Ok(out_time)) => out_time >= src_time,
        _ => false,
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ScssError> {
    std::fs::write(path, bytes).map_err(|source| ScssError::Io {
        path: path.to_path_buf(),
        source,
    })
}
