use keyer::KeyerConfig;
use keyer_base::log::{error, info};
use keyer_decode::{decode, write_masks, DecodeRequest};
use std::env;
use std::path::PathBuf;

fn load_config() -> Result<KeyerConfig, keyer::KeyerError> {
    match env::var("KEYER_CONFIG") {
        Ok(path) => KeyerConfig::from_file(path),
        Err(_) => Ok(KeyerConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    keyer_base::init_logger_from_env();

    let Some(input) = env::args().nth(1) else {
        eprintln!("usage: keyer-decode <request.json>");
        eprintln!("  KEYER_CONFIG    JSON config file (optional)");
        eprintln!("  KEYER_MASK_DIR  write pasted keypoint maps as PNG (optional)");
        eprintln!("  KEYER_LOG       log level (optional)");
        std::process::exit(2);
    };

    let config = load_config()?;
    info!("config: {:?}", config);

    let json = std::fs::read_to_string(&input)?;
    let request = DecodeRequest::from_json_str(&json)?;

    let response = match decode(&request, &config) {
        Ok(response) => response,
        Err(e) => {
            error!("decoding {} failed: {}", input, e);
            return Err(e.into());
        }
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Ok(dir) = env::var("KEYER_MASK_DIR") {
        let written = write_masks(&request, &config, &PathBuf::from(dir))?;
        info!("wrote {} keypoint maps", written.len());
    }

    Ok(())
}
