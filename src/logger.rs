use std::fmt::Debug;

use log::{Level, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};

use crate::shannon_fano::{CodeTable, DecodeTrie, SymbolFrequency};

const LOG_CONFIG_VARIABLE: &str = "SHANNON_FANO_LOG_CONFIG";
const DEFAULT_LOG_CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    let config_file =
        std::env::var(LOG_CONFIG_VARIABLE).unwrap_or_else(|_| DEFAULT_LOG_CONFIG_FILE.to_owned());
    if log4rs::init_file(&config_file, Default::default()).is_err() {
        init_stderr_fallback();
    }
}

fn init_stderr_fallback() {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config.map(log4rs::init_config) {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => eprintln!("Unable to install the stderr logger: {}", e),
        Err(e) => eprintln!("Invalid stderr logger configuration: {}", e),
    }
}

pub fn log_frequencies<T: Debug>(frequencies: &[SymbolFrequency<T>]) {
    if !log::log_enabled!(Level::Debug) {
        return;
    }
    let entries: Vec<String> = frequencies
        .iter()
        .map(|sf| format!("({:?}, {})", sf.symbol, sf.frequency))
        .collect();
    log::debug!("frequencies\n[{}]", entries.join(", "));
}

pub fn log_code_table<T: Debug>(code_table: &CodeTable<T>) {
    log::debug!("code table\n{}", code_table);
}

pub fn log_decode_trie<T: Debug>(decode_trie: &DecodeTrie<T>) {
    log::debug!("decode trie\n{}", decode_trie);
}
