use std::path::Path;

use tracing::{debug, info};

use super::{extractor, Formatter, GoModuleTree, Renderer, Request, SignatureParser, SourceTree};
use crate::config::Config;
use crate::error::Result;

/// Orchestrates one generation request: validate, acquire the source tree,
/// extract raw signatures, parse them into methods, render, post-process.
///
/// The engine holds no per-request state; a request is built, threaded
/// through the pipeline once and discarded.
pub struct Engine {
    config: Config,
    parser: SignatureParser,
    renderer: Renderer,
    formatter: Formatter,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        Self::with_config(Config::load_or_default(config_path)?)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        debug!(?config, "loaded configuration");

        let parser = SignatureParser::new()?;
        let renderer = Renderer::new()?;
        let formatter = Formatter::new(&config.formatter);

        Ok(Self {
            config,
            parser,
            renderer,
            formatter,
        })
    }

    /// Generate the requested artifact for a module fetched through the Go
    /// toolchain.
    pub async fn generate(&self, request: Request) -> Result<String> {
        request.validate()?;

        let tree = GoModuleTree::acquire(&request.module, &self.config.source).await?;
        self.generate_from_tree(&tree, request).await
    }

    /// The same pipeline over an already-acquired source tree.
    pub async fn generate_from_tree(
        &self,
        tree: &dyn SourceTree,
        mut request: Request,
    ) -> Result<String> {
        request.validate()?;

        let signatures = extractor::extract_signatures(tree, &request.package, &request.type_name)?;
        info!(
            count = signatures.len(),
            package = %request.package,
            type_name = %request.type_name,
            "extracted method signatures"
        );

        request.methods = self.parser.parse(&signatures, &request.package);

        let rendered = self.renderer.render(&request)?;
        Ok(self.formatter.format(rendered, &request.module).await)
    }
}
