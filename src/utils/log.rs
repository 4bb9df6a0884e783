use log::LevelFilter;

pub struct Logger;

impl Logger {
    /// Installs the colored logger. HTTP internals stay at `warn` unless the
    /// requested level is `trace`.
    pub fn init(level: LevelFilter) {
        let mut builder: env_logger::Builder = colog::default_builder();
        builder.filter_level(level);
        if level < LevelFilter::Trace {
            builder.filter_module("reqwest", LevelFilter::Warn);
            builder.filter_module("hyper_util", LevelFilter::Warn);
        }
        builder.init();
    }
}
