use crate::config::ViewerConfig;

pub fn setup_logging(config: &ViewerConfig) -> anyhow::Result<()> {
    common::setup_logging(config.environment)
}
