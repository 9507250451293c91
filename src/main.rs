//! Demo CLI: indexes a directory of markdown docs and runs one search
//! against it.
//!
//! ```text
//! docsearch <docs-dir> <query>
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use docsearch::{Schema, SearchConfig, SourceKind, TenantConfig, TenantRuntime};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let docs_dir = args.next().ok_or("usage: docsearch <docs-dir> <query>")?;
    let query = args.next().ok_or("usage: docsearch <docs-dir> <query>")?;

    let schema = Schema::documentation_default();
    let config = TenantConfig {
        codename: "demo".into(),
        display_name: "Demo Docs".into(),
        description: format!("ad-hoc index of {docs_dir}"),
        source_kind: SourceKind::Filesystem,
        docs_root_dir: PathBuf::from(&docs_dir),
        example_queries: vec![query.clone()],
        url_prefixes: vec![],
        search: SearchConfig::default(),
    };

    let runtime = Arc::new(TenantRuntime::new(config, schema));
    runtime.refresh()?;

    let response = runtime.search(&query, 10, false)?;
    println!("{} hit(s) for {query:?}:", response.results.len());
    for hit in &response.results {
        println!("  {:>8.3}  {}", hit.score, hit.uri);
    }

    Ok(())
}
