use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voxchat::voice::AudioCapture;
use voxchat::{
    ChatClient, ChatModel, Config, Session, SkipReason, SpeechToText, TextToSpeech,
    TurnController, TurnOutcome,
};

/// voxchat - single-session voice assistant
#[derive(Parser)]
#[command(name = "voxchat", version, about)]
struct Cli {
    /// Chat model: "gpt-4"/"high" or "gpt-3.5-turbo"/"fast"
    #[arg(short, long, env = "VOXCHAT_CHAT_MODEL")]
    model: Option<String>,

    /// Path for the rendered HTML transcript
    #[arg(long, env = "VOXCHAT_TRANSCRIPT", default_value = "transcript.html")]
    transcript: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,voxchat=info",
        1 => "info,voxchat=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
        };
    }

    let config = Config::load()?;

    let model = match cli.model {
        Some(s) => s.parse()?,
        None => config.chat_model,
    };

    let transcriber = SpeechToText::new(config.api_key.clone(), config.voice.stt_model.clone())?;
    let responder = ChatClient::new(config.api_key.clone())?;
    let synthesizer = TextToSpeech::new(
        config.api_key.clone(),
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
    )?;

    let mut controller = TurnController::new(
        Box::new(transcriber),
        Box::new(responder),
        Box::new(synthesizer),
        model,
    );
    let mut session = Session::new();
    // cpal streams aren't Send, so capture stays on the main task
    let mut capture = AudioCapture::new()?;

    println!("voxchat ready (model: {model})");
    println!("  Enter        start/stop recording");
    println!("  model <id>   switch chat model (gpt-4, gpt-3.5-turbo)");
    println!("  reset        clear the conversation");
    println!("  quit         exit");

    let stdin = std::io::stdin();
    let mut pending_clip = None;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        match input {
            "quit" | "exit" => break,
            "reset" => {
                controller.reset(&mut session);
                println!("conversation cleared");
                continue;
            }
            "" => {
                if capture.is_recording() {
                    if let Some(clip) = capture.stop()? {
                        println!("captured {:.1}s of audio", clip.duration.as_secs_f64());
                        pending_clip = Some(clip);
                    } else {
                        println!("no audio captured");
                    }
                } else {
                    capture.start()?;
                    println!("recording... press Enter to stop");
                    continue;
                }
            }
            other => {
                if let Some(id) = other.strip_prefix("model ") {
                    match id.trim().parse::<ChatModel>() {
                        Ok(m) => {
                            controller.set_model(m);
                            println!("model set to {m}");
                        }
                        Err(e) => println!("{e}"),
                    }
                } else {
                    println!("unknown command: {other}");
                }
                continue;
            }
        }

        // One processing cycle per trigger; already-processed clips are skipped
        match controller.process(&mut session, pending_clip.as_ref()).await {
            Ok(TurnOutcome::Completed(turn)) => {
                println!("you: {}", turn.transcript);
                println!("assistant: {}", turn.reply);
                if turn.audio_html.is_none() {
                    println!("(audio unavailable, reply shown as text only)");
                }
                write_transcript(&cli.transcript, &turn.transcript_html, turn.audio_html.as_deref())?;
                println!("transcript written to {}", cli.transcript.display());
            }
            Ok(TurnOutcome::Skipped(reason)) => match reason {
                SkipReason::ResetCycle => println!("(cycle suppressed after reset)"),
                SkipReason::EmptyCapture => println!("(empty recording ignored)"),
                SkipReason::NoCapture | SkipReason::AlreadyProcessed => {}
            },
            Err(e) => {
                // Turn-scoped failure: report and keep the session usable
                println!("turn failed: {e}");
            }
        }
    }

    Ok(())
}

/// Write the rendered transcript (and reply audio, if any) as an HTML page
fn write_transcript(path: &Path, transcript_html: &str, audio_html: Option<&str>) -> anyhow::Result<()> {
    let page = format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>voxchat</title></head>\n\
         <body>\n{transcript_html}{}\n</body>\n</html>\n",
        audio_html.unwrap_or_default()
    );
    std::fs::write(path, page)?;
    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let energy = capture.level();

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{:2}s] RMS: {:.4} | [{}]", i + 1, energy, meter);

        // Clear buffer each second
        capture.clear_buffer();
    }

    let _ = capture.stop()?;

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check your input device and levels.");

    Ok(())
}
