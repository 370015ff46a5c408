use super::{json_pretty, load_schema, read_body, EXIT_SUCCESS};
use formkeys_core::{ContentType, Normalizer, NormalizerConfig};
use std::path::Path;
use tracing::info;

pub struct NormalizeOptions<'a> {
    pub schema: &'a Path,
    pub pointer: Option<&'a str>,
    pub content_type: &'a str,
    pub body: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub max_depth: Option<usize>,
    pub compact: bool,
}

pub fn run(options: &NormalizeOptions<'_>) -> Result<u8, String> {
    let config = resolve_config(options.config, options.max_depth)?;
    let content_type = ContentType::parse(options.content_type).ok_or_else(|| {
        format!(
            "input error: invalid content type '{}', expected '<type>/<subtype>'",
            options.content_type
        )
    })?;
    let schema = load_schema(options.schema, options.pointer)?;
    let body = read_body(options.body)?;

    if !content_type.is_form() {
        info!("{content_type} is not a form encoding, body is passed through");
    }
    let normalized = Normalizer::new(config).normalize(body, &content_type, Some(schema.root()));

    if options.compact {
        let line = serde_json::to_string(&normalized)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{line}");
    } else {
        println!("{}", json_pretty(&normalized)?);
    }
    Ok(EXIT_SUCCESS)
}

fn resolve_config(
    path: Option<&Path>,
    max_depth: Option<usize>,
) -> Result<NormalizerConfig, String> {
    let mut config = match path {
        Some(path) => NormalizerConfig::load(path).map_err(|e| format!("config error: {e}"))?,
        None => NormalizerConfig::default(),
    };
    if let Some(max_depth) = max_depth {
        config = config.with_max_depth(max_depth);
    }
    config.validate().map_err(|e| format!("config error: {e}"))?;
    Ok(config)
}
