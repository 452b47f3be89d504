use crate::models::{Blood, HomeResponse};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn render_index(home: &HomeResponse) -> String {
    let progress = if home.completed {
        "Done".to_string()
    } else {
        format!("{}%", home.completion_pct)
    };

    INDEX_HTML
        .replace("{{DATE}}", &home.date)
        .replace("{{PROGRESS}}", &progress)
        .replace("{{PCT}}", &home.completion_pct.to_string())
        .replace("{{WEEK}}", &render_week(home))
        .replace("{{SUMMARY}}", &render_summary(home))
}

fn render_week(home: &HomeResponse) -> String {
    home.week
        .iter()
        .zip(DAY_NAMES)
        .map(|(day, name)| {
            let mut class = String::from("day");
            if day.is_today {
                class.push_str(" today");
            }
            if day.completed {
                class.push_str(" done");
            }
            let score = day
                .condition_score
                .map(|score| format!("<span class=\"score {}\">{score}</span>", score_band(score)))
                .unwrap_or_default();
            let number = day.date.rsplit('-').next().unwrap_or_default();
            format!(
                "<li class=\"{class}\"><span class=\"name\">{name}</span><span class=\"num\">{number}</span>{score}</li>"
            )
        })
        .collect()
}

fn render_summary(home: &HomeResponse) -> String {
    let Some(summary) = &home.summary else {
        return String::from("<p class=\"muted\">Today has not been saved yet.</p>");
    };
    let blood = match summary.blood {
        Blood::None => "none",
        Blood::Trace => "trace",
        Blood::Moderate => "moderate",
        Blood::Heavy => "heavy",
    };
    format!(
        "<dl class=\"summary\">\
         <div><dt>Bowel</dt><dd>{bowel}x</dd></div>\
         <div><dt>Blood</dt><dd>{blood}</dd></div>\
         <div><dt>Condition</dt><dd class=\"{band}\">{score}/10</dd></div>\
         <div><dt>Sleep</dt><dd>{sleep}</dd></div>\
         </dl>",
        bowel = summary.bowel_count,
        band = score_band(summary.condition_score),
        score = summary.condition_score,
        sleep = summary.sleep.as_deref().unwrap_or("--"),
    )
}

fn score_band(score: u8) -> &'static str {
    match score {
        0..=3 => "low",
        4..=6 => "mid",
        _ => "high",
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>UC Journal</title>
  <style>
    :root {
      --bg: #0f1117;
      --card: #1a1d27;
      --accent: #6c9cfc;
      --green: #4ecba0;
      --orange: #f5a742;
      --red: #f06868;
      --text: #e8eaf0;
      --muted: #555b73;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--text);
      font-family: system-ui, sans-serif;
      display: grid;
      place-items: start center;
      padding: 24px 16px;
    }

    main {
      width: min(480px, 100%);
      display: grid;
      gap: 16px;
    }

    section {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
    }

    h1 { margin: 0; font-size: 1.5rem; }
    .muted { color: var(--muted); }

    .bar { height: 4px; background: rgba(255, 255, 255, 0.06); border-radius: 2px; overflow: hidden; }
    .bar span { display: block; height: 100%; background: var(--accent); }

    ul.week { list-style: none; margin: 0; padding: 0; display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; }
    .day { display: grid; justify-items: center; gap: 2px; padding: 6px 0; border-radius: 10px; }
    .day.today { outline: 2px solid var(--accent); }
    .day.done .num { color: var(--green); }
    .name { font-size: 10px; color: var(--muted); }

    .low { color: var(--red); }
    .mid { color: var(--orange); }
    .high { color: var(--green); }

    .summary { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; margin: 0; }
    dt { font-size: 10px; color: var(--muted); text-transform: uppercase; }
    dd { margin: 0; font-size: 18px; font-weight: 700; }
  </style>
</head>
<body>
  <main>
    <header>
      <p class="muted">{{DATE}}</p>
      <h1>UC Journal</h1>
    </header>
    <section>
      <ul class="week">{{WEEK}}</ul>
    </section>
    <section>
      <p>Today's record <strong>{{PROGRESS}}</strong></p>
      <div class="bar"><span style="width: {{PCT}}%"></span></div>
    </section>
    <section>
      {{SUMMARY}}
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DaySummary, WeekDay};

    #[test]
    fn index_shows_progress_and_week() {
        let home = HomeResponse {
            date: "2024-03-06".into(),
            completion_pct: 40,
            completed: false,
            week: vec![WeekDay {
                date: "2024-03-04".into(),
                is_today: false,
                completed: true,
                condition_score: Some(8),
            }],
            summary: None,
        };
        let html = render_index(&home);
        assert!(html.contains("40%"));
        assert!(html.contains("class=\"day done\""));
        assert!(html.contains("<span class=\"score high\">8</span>"));
        assert!(html.contains("not been saved"));
    }

    #[test]
    fn index_shows_summary_when_done() {
        let home = HomeResponse {
            date: "2024-03-06".into(),
            completion_pct: 100,
            completed: true,
            week: Vec::new(),
            summary: Some(DaySummary {
                bowel_count: 3,
                blood: Blood::Trace,
                condition_score: 2,
                sleep: None,
            }),
        };
        let html = render_index(&home);
        assert!(html.contains("Done"));
        assert!(html.contains("<dd>trace</dd>"));
        assert!(html.contains("<dd class=\"low\">2/10</dd>"));
        assert!(html.contains("<dd>--</dd>"));
    }
}
