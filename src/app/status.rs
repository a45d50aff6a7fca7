use limericks::config::LimerickConfig;

pub fn render_status(config: &LimerickConfig) -> String {
    let data = &config.data;
    let mut lines = vec![
        format!("limericks {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!("config        {}", config.config_path.display()),
        format!(
            "seed          {}",
            config
                .seed
                .map_or_else(|| "(random)".to_string(), |seed| seed.to_string())
        ),
        format!("log level     {}", config.observability.log_level),
        String::new(),
        format!("strategy      {}", config.poem.strategy),
        format!("syllables     {}", config.poem.first_line_syllables),
        format!("beam width    {}", config.search.beam_width),
        format!("templates     {}", config.search.rand_templates),
        format!(
            "search space  {} {:?}",
            config.search.search_space, config.search.budget_schedule
        ),
        format!("excluded      {}", config.search.excluded_words.len()),
        String::new(),
    ];

    match &config.rhyme.offline_table {
        Some(table) => lines.push(format!("rhymes        offline table {table}")),
        None => lines.push(format!(
            "rhymes        {} (retries {}, cache {})",
            config.rhyme.api_url,
            config.rhyme.max_retries,
            if config.rhyme.cache { "on" } else { "off" }
        )),
    }

    lines.push(String::new());
    for (label, file) in [
        ("tags", &data.tags),
        ("cmudict", &data.cmudict),
        ("templates", &data.templates),
        ("embeddings", &data.embeddings),
        ("definitions", &data.definitions),
        ("first lines", &data.first_lines),
    ] {
        let path = data.resolve(file);
        let marker = if path.exists() { "" } else { " (missing)" };
        lines.push(format!("{label:<13} {}{marker}", path.display()));
    }

    lines.join("\n")
}
