//! Connectivity and completion demo runner
//!
//! Runs the whole check: guarded exit on a missing key, optional
//! reachability probe, one plain and one streaming completion, and
//! remediation guidance for whatever goes wrong.

use crate::config::Settings;
use crate::models::openai::OpenAIRequest;
use crate::providers::Provider;
use crate::services::diagnosis::{classify, Diagnosis, Guidance};
use crate::utils::error::{ClientError, RunError};
use std::fmt::Display;
use std::io::{self, Stderr, Stdout, Write};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No API key was configured
    MissingApiKey,
    /// The reachability probe failed
    Unreachable,
    /// Both completion calls succeeded
    Completed,
    /// A completion call failed
    Failed(Diagnosis),
}

/// Output sinks for the demo
pub struct Console<O, E> {
    out: O,
    err: E,
}

impl Console<Stdout, Stderr> {
    /// Console bound to the process's stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Give back the underlying writers
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    fn complain(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.err, "{}", line)
    }

    /// Write a streamed fragment without a newline and make it visible now
    fn fragment(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn guidance(&mut self, guidance: &Guidance) -> io::Result<()> {
        for line in &guidance.headline {
            self.complain(line)?;
        }
        if let Some(intro) = guidance.intro {
            self.say(format_args!("\n{}", intro))?;
        }
        for (i, step) in guidance.steps.iter().enumerate() {
            self.say(format_args!("{}. {}", i + 1, step))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

/// Demo runner
pub struct Runner<P> {
    settings: Settings,
    provider: P,
}

impl<P: Provider> Runner<P> {
    pub fn new(settings: Settings, provider: P) -> Self {
        Self { settings, provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run the demo, writing all output to `console`
    ///
    /// Only console write failures are returned as errors; every provider
    /// failure is reported on the console and ends the run normally.
    pub async fn run<O: Write, E: Write>(&self, console: &mut Console<O, E>) -> io::Result<Outcome> {
        let outcome = self.run_inner(console).await?;
        console.flush()?;
        info!("Demo finished: {:?}", outcome);
        Ok(outcome)
    }

    async fn run_inner<O: Write, E: Write>(&self, console: &mut Console<O, E>) -> io::Result<Outcome> {
        if self.settings.openrouter.api_key.is_none() {
            console.complain("❌ OPENROUTER_API_KEY is not set in your .env file")?;
            console.say("Please add your OpenRouter API key to the .env file:")?;
            console.say("OPENROUTER_API_KEY=your_api_key_here")?;
            return Ok(Outcome::MissingApiKey);
        }

        if self.settings.demo.probe_connectivity {
            console.say("🔄 Testing network connectivity...")?;
            match self.provider.probe().await {
                Ok(()) => console.say("✅ Network connectivity confirmed")?,
                Err(e) => {
                    warn!("Reachability probe failed: {}", e);
                    let diagnosis = Diagnosis::unreachable(self.settings.openrouter.site_host());
                    console.guidance(&diagnosis.guidance())?;
                    return Ok(Outcome::Unreachable);
                }
            }
        } else {
            debug!("Reachability probe disabled");
        }

        match self.exercise(console).await {
            Ok(()) => Ok(Outcome::Completed),
            Err(RunError::Client(e)) => {
                warn!("Completion check failed: {:?}", e);
                let diagnosis = classify(&e, self.settings.demo.guidance);
                console.complain("❌ Error occurred:")?;
                console.guidance(&diagnosis.guidance())?;
                Ok(Outcome::Failed(diagnosis))
            }
            Err(RunError::Io(e)) => Err(e),
        }
    }

    /// Both completion calls, in order
    async fn exercise<O: Write, E: Write>(&self, console: &mut Console<O, E>) -> Result<(), RunError> {
        let demo = &self.settings.demo;

        console.say("🔄 Testing OpenRouter API connection...")?;
        let request = OpenAIRequest::user_prompt(&demo.model, &demo.prompt);
        let completion = self.provider.chat_complete(request).await?;

        console.say("✅ API call successful!")?;
        let choices = serde_json::to_string_pretty(&completion.choices).map_err(ClientError::from)?;
        console.say(choices)?;

        console.say("\n🔄 Testing streaming response...")?;
        let request = OpenAIRequest::user_prompt(&demo.stream_model, &demo.prompt).streaming();
        let mut stream = self.provider.chat_stream(request).await?;

        console.say("Stream response: ")?;
        let mut fragments = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            console.fragment(chunk.delta_text())?;
            fragments += 1;
        }
        debug!("Stream ended after {} chunks", fragments);

        console.say("\n✅ Streaming test completed!")?;
        Ok(())
    }
}
