use colored::*;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, Write};

#[derive(Debug, Deserialize)]
struct PlateResponse {
    mensaje: String,
    permitido: bool,
    salida: Option<bool>,
    puesto: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "🅿️ Parqueadero - Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = get_base_url()?;
    let client = reqwest::Client::new();

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🚗 Validar placa (ingreso/salida)");
        println!("2. 📊 Ver ocupación");
        println!("3. 🩺 Health check");
        println!("4. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-4): ".bright_yellow());
        io::stdout().flush()?;

        let choice = read_line()?;

        match choice.as_str() {
            "1" => {
                print!("{}", "Placa: ".bright_yellow());
                io::stdout().flush()?;
                let plate = read_line()?;
                if let Err(e) = validate_plate(&client, &base_url, &plate).await {
                    println!("{} {}", "❌ Error:".bright_red(), e);
                }
            }
            "2" => {
                if let Err(e) = show_json(&client, &format!("{}/puestos", base_url)).await {
                    println!("{} {}", "❌ Error:".bright_red(), e);
                }
            }
            "3" => {
                if let Err(e) = show_json(&client, &format!("{}/health", base_url)).await {
                    println!("{} {}", "❌ Error:".bright_red(), e);
                }
            }
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
            }
        }
    }

    Ok(())
}

fn read_line() -> Result<String, Box<dyn std::error::Error>> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn get_base_url() -> Result<String, Box<dyn std::error::Error>> {
    let default_url = std::env::var("PARKING_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    print!("{} [{}]: ", "URL del servidor".bright_yellow(), default_url);
    io::stdout().flush()?;
    let url = read_line()?;

    let url = if url.is_empty() { default_url } else { url };
    Ok(url.trim_end_matches('/').to_string())
}

async fn validate_plate(
    client: &reqwest::Client,
    base_url: &str,
    plate: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/validar_placa/", base_url);
    let payload = json!({ "placa": plate });

    println!("{} POST {}", "📤".bright_blue(), url);
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let response = client.post(&url).json(&payload).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        println!("{} {} {}", "⚠️ HTTP".bright_red(), status, body["detail"]);
        return Ok(());
    }

    let result: PlateResponse = response.json().await?;
    if result.permitido {
        let movement = if result.salida == Some(true) { "SALIDA" } else { "INGRESO" };
        println!(
            "{} {} - puesto {}",
            format!("✅ {}", movement).bright_green().bold(),
            result.mensaje,
            result.puesto.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
        );
    } else {
        println!("{} {}", "🚫 NEGADO".bright_red().bold(), result.mensaje);
    }

    Ok(())
}

async fn show_json(client: &reqwest::Client, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} GET {}", "📤".bright_blue(), url);
    let response = client.get(url).send().await?;
    let status = response.status();
    let body: Value = response.json().await?;

    let pretty = serde_json::to_string_pretty(&body)?;
    if status.is_success() {
        println!("{}", pretty.bright_cyan());
    } else {
        println!("{} {}", format!("⚠️ HTTP {}", status).bright_red(), pretty);
    }
    Ok(())
}
