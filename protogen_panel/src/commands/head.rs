//! Head commands: mode, emotion, brightness, screen and colours

use super::{print_done, print_list};
use colored::*;
use protogen_core::{PanelError, PanelResult, ProtogenClient};

pub async fn set_mode(client: &ProtogenClient, mode: &str) -> PanelResult<()> {
    client.set_mode(mode).await?;
    print_done(&format!("Mode set to {}", mode.cyan()));
    Ok(())
}

/// Print the current emotion, or set it
pub async fn emotion(client: &ProtogenClient, set: Option<&str>) -> PanelResult<()> {
    match set {
        Some(emotion) => {
            let known = client.emotions().await?;
            if !known.iter().any(|e| e.as_str() == emotion) {
                return Err(PanelError::InvalidInput(format!(
                    "Unknown emotion '{}'. Use 'protogen head emotions' to list them.",
                    emotion
                )));
            }
            client.set_emotion(emotion).await?;
            print_done(&format!("Emotion set to {}", emotion.cyan()));
        }
        None => println!("{}", client.emotion().await?),
    }
    Ok(())
}

pub async fn list_emotions(client: &ProtogenClient) -> PanelResult<()> {
    let emotions = client.emotions().await?;
    let current = client.emotion().await.ok();
    if emotions.is_empty() {
        print_list("Emotions", &emotions, "The head has no emotions installed");
        return Ok(());
    }

    println!("{}", "Emotions:".green().bold());
    for emotion in &emotions {
        if current.as_deref() == Some(emotion.as_str()) {
            println!("  {} {}", emotion.as_str().white().bold(), "(current)".green());
        } else {
            println!("  {}", emotion);
        }
    }
    Ok(())
}

/// Print the current brightness level, or set it
pub async fn brightness(client: &ProtogenClient, set: Option<&str>) -> PanelResult<()> {
    match set {
        Some(level) => {
            client.set_brightness(level).await?;
            print_done(&format!("Brightness set to {}", level.cyan()));
        }
        None => println!("{}", client.brightness().await?),
    }
    Ok(())
}

pub async fn list_brightness_levels(client: &ProtogenClient) -> PanelResult<()> {
    let levels = client.brightness_levels().await?;
    print_list("Brightness levels", &levels, "The head reports no brightness levels");
    Ok(())
}

/// Print whether the screen is blanked, or set it
pub async fn blank(client: &ProtogenClient, set: Option<bool>) -> PanelResult<()> {
    match set {
        Some(blank) => {
            client.set_blank(blank).await?;
            print_done(if blank { "Screen blanked" } else { "Screen visible" });
        }
        None => println!("{}", client.blank().await?),
    }
    Ok(())
}

pub async fn audio_loudness(client: &ProtogenClient, level: u8) -> PanelResult<()> {
    if level > 100 {
        return Err(PanelError::InvalidInput(format!(
            "Audio loudness must be 0-100, got {}",
            level
        )));
    }
    client.set_audio_loudness(level).await?;
    print_done(&format!("Audio loudness set to {}", level));
    Ok(())
}

pub async fn mouth_color(client: &ProtogenClient, color: &str) -> PanelResult<()> {
    client.set_mouth_color(color).await?;
    print_done(&format!("Mouth colour set to {}", color.cyan()));
    Ok(())
}

pub async fn eye_color(client: &ProtogenClient, color: &str) -> PanelResult<()> {
    client.set_eye_color(color).await?;
    print_done(&format!("Eye colour set to {}", color.cyan()));
    Ok(())
}
