use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name    = "flora-bridge",
    about   = "Plant identification backend bridging cloud vision, language and speech APIs",
    version
)]
pub struct Config {
    /// Azure Computer Vision resource endpoint, e.g.
    /// https://my-resource.cognitiveservices.azure.com
    #[arg(long, env = "VISION_ENDPOINT", default_value = "")]
    pub vision_endpoint: String,

    /// Azure Computer Vision subscription key.
    #[arg(long, env = "VISION_KEY", default_value = "", hide_env_values = true)]
    pub vision_key: String,

    /// Azure OpenAI resource endpoint, e.g.
    /// https://my-resource.openai.azure.com
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT", default_value = "")]
    pub openai_endpoint: String,

    /// Azure OpenAI API key.
    #[arg(long, env = "AZURE_OPENAI_KEY", default_value = "", hide_env_values = true)]
    pub openai_key: String,

    /// Azure OpenAI chat deployment name.
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT", default_value = "")]
    pub openai_deployment: String,

    /// Azure Speech subscription key.
    #[arg(long, env = "SPEECH_KEY", default_value = "", hide_env_values = true)]
    pub speech_key: String,

    /// Azure Speech region, e.g. westeurope.
    #[arg(long, env = "SPEECH_REGION", default_value = "")]
    pub speech_region: String,

    /// Host address to listen on.
    #[arg(long, env = "FLORA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "FLORA_PORT", default_value_t = 5000)]
    pub port: u16,
}

impl Config {
    /// All credentials are checked up front so a misconfigured deployment
    /// fails at startup instead of on the first request that needs the
    /// missing service.
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("VISION_ENDPOINT",         &self.vision_endpoint),
            ("VISION_KEY",              &self.vision_key),
            ("AZURE_OPENAI_ENDPOINT",   &self.openai_endpoint),
            ("AZURE_OPENAI_KEY",        &self.openai_key),
            ("AZURE_OPENAI_DEPLOYMENT", &self.openai_deployment),
            ("SPEECH_KEY",              &self.speech_key),
            ("SPEECH_REGION",           &self.speech_region),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required configuration: {}. \
                 Set these in your shell or in flora-bridge/.env",
                missing.join(", ")
            );
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
