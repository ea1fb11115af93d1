// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    token_capacity_hint: usize,
    max_logged_lexeme_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ANNOTATION_LEXER_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=ANNOTATION_LEXER_CONFIG_DIR");

    let profile =
        env::var("ANNOTATION_LEXER_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir =
        env::var("ANNOTATION_LEXER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of annotation_lexer directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    if config.lexical.token_capacity_hint == 0 {
        panic!("lexical.token_capacity_hint must be at least 1");
    }

    if config.lexical.max_logged_lexeme_length < 8 {
        panic!("lexical.max_logged_lexeme_length too small (min: 8)");
    }

    if config.logging.log_buffer_size == 0 {
        panic!("logging.log_buffer_size must be at least 1");
    }

    if config.logging.max_log_message_length < 64 {
        panic!("logging.max_log_message_length too small (min: 64)");
    }

    if profile == "production" && config.logging.log_buffer_size > 100_000 {
        panic!("PRODUCTION: logging.log_buffer_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const TOKEN_CAPACITY_HINT: usize = {};
        pub const MAX_LOGGED_LEXEME_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.lexical.token_capacity_hint,
        config.lexical.max_logged_lexeme_length,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
