// Shared build script helper: folds a crate's README.md into its rustdoc.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Copy `README.md` into `OUT_DIR/README_GENERATED.md`, rewriting links so
/// rustdoc can resolve them.
///
/// - `](src/foo.rs)` becomes `](foo)` so links land on modules
/// - `](../../README.md` becomes the repository URL from the workspace manifest
///
/// A crate without a README gets a one-line placeholder so `include_str!`
/// in the crate root always has something to include.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let rustdoc_content = fs::read_to_string(&readme_path).map_or_else(
        |_| String::from("polyread workspace crate.\n"),
        |content| rewrite_readme_links(&content, workspace_repo_url(crate_dir).as_deref()),
    );

    fs::write(dest_path, rustdoc_content).expect("failed to write README_GENERATED.md");
}

fn rewrite_readme_links(content: &str, repo_url: Option<&str>) -> String {
    let rewritten = content.replace("](src/", "](").replace(".rs)", ")");
    match repo_url {
        Some(url) => rewritten.replace("](../../README.md", &format!("]({url}")),
        None => rewritten,
    }
}

/// Read `repository = "..."` from the workspace `Cargo.toml`.
fn workspace_repo_url(crate_dir: &str) -> Option<String> {
    let workspace_toml = Path::new(crate_dir)
        .parent()? // crates/
        .parent()? // workspace root
        .join("Cargo.toml");

    let content = fs::read_to_string(workspace_toml).ok()?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("repository") && line.contains('='))
        .find_map(|line| {
            let start = line.find('"')?;
            let end = line.rfind('"')?;
            (start < end).then(|| line[start + 1..end].to_string())
        })
}
