use crate::{events::Plugins, settings::Settings};

pub struct CtxData {
    pub settings: Settings,
    pub plugins: Plugins,
}

impl CtxData {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            plugins: Plugins::new(),
        }
    }
}
