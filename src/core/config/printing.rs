use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset, using {})", self.model_or_default()),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {})", self.base_url_or_default()),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
    }
}
