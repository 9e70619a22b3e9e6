use async_trait::async_trait;

use crate::{
    cli::{Command, CommandResult, formatting::format_description},
    services::playback::{Resolution, SourceResolver},
};

/// Resolves media source paths the way the engine would before loading them.
///
/// # Example Usage
///
/// ```bash
/// listenparty resolve /uploads/media-uploads/ep-1.mp3 /cdn-uploads/intro.mp3
/// ```
pub struct ResolveCommand {
    resolver: SourceResolver,
    paths: Vec<String>,
}

impl ResolveCommand {
    /// Creates a new ResolveCommand
    pub fn new(resolver: SourceResolver, paths: Vec<String>) -> Self {
        Self { resolver, paths }
    }
}

#[async_trait]
impl Command for ResolveCommand {
    async fn execute(&self) -> CommandResult {
        let lines: Vec<String> = self
            .paths
            .iter()
            .map(|path| {
                let (url, rule) = self.resolver.resolve_path(path);
                format!("{url}  {}", format_description(rule_name(rule)))
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

fn rule_name(rule: Resolution) -> &'static str {
    match rule {
        Resolution::Absolute => "(absolute)",
        Resolution::Cdn => "(cdn)",
        Resolution::Uploads => "(uploads)",
        Resolution::Origin => "(origin)",
    }
}
