//! Line commands accepted by the interactive session.

use infinityad_core::Msg;

pub const HELP: &str = "\
Comandos:
  scrape <url> [--bypass-cache]        Scrapear produto
  analyze <url> [--force]              Analisar vídeo do YouTube
  ad <produto> [youtube] [--style s]   Gerar anúncio
  clear-cache [marketplace]            Limpar cache (padrão: all)
  clear                                Limpar mensagens
  help                                 Mostrar esta ajuda
  quit                                 Sair";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Command::Empty;
    };
    let rest: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "scrape" => {
            let (flags, args) = split_flags(&rest);
            Command::Dispatch(vec![
                Msg::ProductUrlChanged(first(&args)),
                Msg::BypassCacheToggled(flags.contains(&"--bypass-cache")),
                Msg::ScrapeSubmitted,
            ])
        }
        "analyze" => {
            let (flags, args) = split_flags(&rest);
            Command::Dispatch(vec![
                Msg::YoutubeUrlChanged(first(&args)),
                Msg::ForceReanalysisToggled(flags.contains(&"--force")),
                Msg::AnalyzeSubmitted,
            ])
        }
        "ad" => parse_ad(&rest),
        "clear-cache" => Command::Dispatch(vec![Msg::ClearCacheRequested {
            marketplace: first(&rest),
        }]),
        "clear" => Command::Dispatch(vec![Msg::DismissMessages]),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(verb.to_string()),
    }
}

fn parse_ad(rest: &[&str]) -> Command {
    let mut style = None;
    let mut positional = Vec::new();
    let mut words = rest.iter();
    while let Some(word) = words.next() {
        match *word {
            "--style" => style = words.next().map(|value| value.to_string()),
            other => positional.push(other),
        }
    }

    let mut msgs = vec![
        Msg::AdProductUrlChanged(first(&positional)),
        Msg::AdYoutubeUrlChanged(positional.get(1).map(|s| s.to_string()).unwrap_or_default()),
    ];
    if let Some(style) = style {
        msgs.push(Msg::AdStyleChanged(style));
    }
    msgs.push(Msg::AdSubmitted);
    Command::Dispatch(msgs)
}

fn split_flags<'a>(words: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    words.iter().copied().partition(|word| word.starts_with("--"))
}

fn first(words: &[&str]) -> String {
    words.first().map(|s| s.to_string()).unwrap_or_default()
}
