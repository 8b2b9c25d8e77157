use crate::models::{Table, MOODS, PARENT_REASONS, STUDENT_REASONS};

pub fn render_home() -> String {
    page("EduTransform", None, HOME_BODY, "")
}

pub fn render_student(
    mood: &Table,
    mood_counts: &[(String, u64)],
    ranked: &Table,
    notice: Option<&str>,
) -> String {
    let trends = if mood.is_empty() {
        info("No mood/focus data yet.")
    } else {
        format!(
            "<h3>Mood Trends</h3>{}<h3>Focus Trends</h3>{}",
            bar_chart(mood_counts),
            FOCUS_CHART_SVG
        )
    };

    let body = STUDENT_BODY
        .replace("{{TRENDS}}", &trends)
        .replace("{{MOOD_OPTIONS}}", &options(MOODS))
        .replace("{{REASON_OPTIONS}}", &options(STUDENT_REASONS))
        .replace(
            "{{LEADERBOARD}}",
            &data_table(ranked, "No leaderboard entries yet."),
        );
    let script = if mood.is_empty() { "" } else { FOCUS_CHART_SCRIPT };
    page("Student Dashboard", notice, &body, script)
}

pub fn render_parent(ranked: &Table, notice: Option<&str>) -> String {
    let body = PARENT_BODY
        .replace("{{REASON_OPTIONS}}", &options(PARENT_REASONS))
        .replace(
            "{{LEADERBOARD}}",
            &data_table(ranked, "No leaderboard entries yet."),
        );
    page("Parent Dashboard", notice, &body, "")
}

pub fn render_teacher(
    mood: &Table,
    mood_counts: &[(String, u64)],
    average_focus: Option<f64>,
    ranked: &Table,
    totals: &[(String, i64)],
    bookings: &Table,
) -> String {
    let analytics = match average_focus {
        Some(avg) => format!(
            "<h3>Mood Distribution</h3>{}\
             <p class=\"metric\">Average Focus Score: <strong>{avg:.2}</strong></p>\
             {}{}",
            bar_chart(mood_counts),
            FOCUS_CHART_SVG,
            data_table(mood, "No student mood/focus data yet."),
        ),
        None => info("No student mood/focus data yet."),
    };

    let body = TEACHER_BODY
        .replace("{{ANALYTICS}}", &analytics)
        .replace(
            "{{LEADERBOARD}}",
            &data_table(ranked, "No leaderboard entries yet."),
        )
        .replace("{{TOTALS}}", &totals_table(totals))
        .replace("{{BOOKINGS}}", &data_table(bookings, "No bookings yet."));
    let script = if mood.is_empty() { "" } else { FOCUS_CHART_SCRIPT };
    page("Teacher Dashboard", None, &body, script)
}

fn page(title: &str, notice: Option<&str>, body: &str, script: &str) -> String {
    let notice_html = match notice {
        Some(text) => format!("<div class=\"notice\">{}</div>", escape(text)),
        None => String::new(),
    };
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{NOTICE}}", &notice_html)
        .replace("{{BODY}}", body)
        .replace("{{SCRIPT}}", script)
}

fn info(message: &str) -> String {
    format!("<p class=\"info\">{}</p>", escape(message))
}

fn options(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!("<option value=\"{0}\">{0}</option>", escape(value)))
        .collect()
}

fn data_table(table: &Table, empty_message: &str) -> String {
    if table.is_empty() {
        return info(empty_message);
    }

    let mut html = String::from("<table><thead><tr>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn totals_table(totals: &[(String, i64)]) -> String {
    if totals.is_empty() {
        return info("No leaderboard entries yet.");
    }

    let mut html =
        String::from("<table><thead><tr><th>Student</th><th>Total Points</th></tr></thead><tbody>");
    for (student, points) in totals {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{points}</td></tr>",
            escape(student)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn bar_chart(counts: &[(String, u64)]) -> String {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);

    let mut html = String::from("<div class=\"bars\">");
    for (value, count) in counts {
        let width = (*count as f64 / max as f64 * 100.0).round() as u64;
        html.push_str(&format!(
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <div class=\"bar-track\"><div class=\"bar\" style=\"width:{width}%\"></div></div>\
             <span class=\"bar-count\">{count}</span></div>",
            escape(value)
        ));
    }
    html.push_str("</div>");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} | EduTransform</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3fb;
      --bg-2: #cdddf5;
      --ink: #22303c;
      --accent: #3567c4;
      --accent-2: #1f4d3a;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(31, 77, 58, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3ecf9 60%, #f2f6fc 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5a6b7a;
    }

    nav a {
      color: var(--accent);
      text-decoration: none;
      font-weight: 600;
      margin-right: 14px;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 20px;
      border: 1px solid rgba(31, 77, 58, 0.08);
      display: grid;
      gap: 12px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .card h3 {
      margin: 8px 0 0;
      font-size: 1.05rem;
      color: #46566a;
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 20px;
    }

    form {
      display: grid;
      gap: 10px;
    }

    label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7a8697;
    }

    input, select {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid rgba(31, 77, 58, 0.2);
      font-size: 1rem;
      font-family: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(53, 103, 196, 0.3);
      justify-self: start;
    }

    button:active {
      transform: scale(0.98);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(31, 77, 58, 0.1);
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7a8697;
    }

    .notice {
      background: #e5f3ea;
      color: #1f6b40;
      border-radius: 12px;
      padding: 12px 16px;
      font-weight: 600;
    }

    .info {
      color: #5a6b7a;
      font-style: italic;
      margin: 0;
    }

    .metric {
      margin: 0;
      font-size: 1.05rem;
    }

    .bars {
      display: grid;
      gap: 8px;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 80px 1fr 40px;
      align-items: center;
      gap: 10px;
    }

    .bar-label {
      font-size: 0.9rem;
    }

    .bar-track {
      background: rgba(53, 103, 196, 0.12);
      border-radius: 999px;
      height: 16px;
    }

    .bar {
      background: var(--accent);
      border-radius: 999px;
      height: 16px;
    }

    .bar-count {
      font-size: 0.9rem;
      text-align: right;
    }

    #focus-chart {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent-2);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent-2);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(31, 77, 58, 0.12);
    }

    .chart-label {
      fill: #7a8697;
      font-size: 11px;
    }

    footer {
      color: #7a8697;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <p class="subtitle">EduTransform | Student Empowerment Platform</p>
      <nav>
        <a href="/">Home</a>
        <a href="/student">Student</a>
        <a href="/parent">Parent</a>
        <a href="/teacher">Teacher</a>
      </nav>
    </header>
    {{NOTICE}}
    {{BODY}}
    <footer>&copy; EduTransform | Student Empowerment Platform</footer>
  </main>
  {{SCRIPT}}
</body>
</html>
"#;

const HOME_BODY: &str = r#"<section class="columns">
      <div class="card">
        <h2>Student</h2>
        <p>Track your mood and focus, earn leaderboard points and book a counseling session.</p>
        <a href="/student">Open the student dashboard</a>
      </div>
      <div class="card">
        <h2>Parent</h2>
        <p>Book a psychologist session for your child and check the leaderboard.</p>
        <a href="/parent">Open the parent dashboard</a>
      </div>
      <div class="card">
        <h2>Teacher</h2>
        <p>Review mood and focus analytics, the leaderboard and all session bookings.</p>
        <a href="/teacher">Open the teacher dashboard</a>
      </div>
    </section>"#;

const STUDENT_BODY: &str = r#"<section class="columns">
      <div class="card">
        <h2>Track Your Mood &amp; Focus</h2>
        <form method="post" action="/student/mood">
          <label for="mood">Today's mood</label>
          <select id="mood" name="mood">{{MOOD_OPTIONS}}</select>
          <label for="focus">Focus level (1 = distracted, 5 = highly focused)</label>
          <select id="focus" name="focus">
            <option>1</option><option>2</option><option>3</option><option>4</option><option>5</option>
          </select>
          <button type="submit">Log Mood &amp; Focus</button>
        </form>
      </div>
      <div class="card">
        {{TRENDS}}
      </div>
    </section>
    <section class="card">
      <h2>Leaderboard</h2>
      {{LEADERBOARD}}
      <form method="post" action="/student/points">
        <label for="student">Your name</label>
        <input id="student" name="student" type="text" required />
        <label for="points">Points to add</label>
        <input id="points" name="points" type="number" min="1" step="1" value="1" required />
        <button type="submit">Add Points</button>
      </form>
    </section>
    <section class="card">
      <h2>Book Psychologist Session</h2>
      <form method="post" action="/student/booking">
        <label for="name">Student name</label>
        <input id="name" name="name" type="text" required />
        <label for="date">Select date</label>
        <input id="date" name="date" type="date" required />
        <label for="reason">Reason</label>
        <select id="reason" name="reason">{{REASON_OPTIONS}}</select>
        <button type="submit">Book Session</button>
      </form>
    </section>"#;

const PARENT_BODY: &str = r#"<section class="card">
      <h2>Book Psychologist for Your Child</h2>
      <form method="post" action="/parent/booking">
        <label for="name">Parent name</label>
        <input id="name" name="name" type="text" required />
        <label for="child">Child name</label>
        <input id="child" name="child" type="text" required />
        <label for="date">Date</label>
        <input id="date" name="date" type="date" required />
        <label for="reason">Reason</label>
        <select id="reason" name="reason">{{REASON_OPTIONS}}</select>
        <button type="submit">Book Session</button>
      </form>
    </section>
    <section class="card">
      <h2>Check Leaderboard</h2>
      {{LEADERBOARD}}
    </section>"#;

const TEACHER_BODY: &str = r#"<section class="card">
      <h2>Student Mood/Focus Analytics</h2>
      {{ANALYTICS}}
    </section>
    <section class="columns">
      <div class="card">
        <h2>Leaderboard Overview</h2>
        {{LEADERBOARD}}
      </div>
      <div class="card">
        <h2>Points per Student</h2>
        {{TOTALS}}
      </div>
    </section>
    <section class="card">
      <h2>Session Bookings</h2>
      {{BOOKINGS}}
    </section>"#;

const FOCUS_CHART_SVG: &str =
    r#"<svg id="focus-chart" viewBox="0 0 600 220" aria-label="Focus trend" role="img"></svg>"#;

const FOCUS_CHART_SCRIPT: &str = r#"<script>
    const chartEl = document.getElementById('focus-chart');

    const renderFocusChart = (points) => {
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 600;
      const height = 220;
      const paddingX = 44;
      const paddingY = 30;
      const min = 0;
      const max = 5;
      const range = max - min;

      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - ((value - min) * (height - paddingY * 2)) / range;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let tick = min; tick <= max; tick += 1) {
        const yPos = y(tick);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${tick}</text>`;
      }

      const labelEvery = points.length > 8 ? Math.ceil(points.length / 8) : 1;
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.label}</text>`;
        })
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="4" />`)
        .join('');

      chartEl.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${xLabels}`;
    };

    fetch('/api/mood-log')
      .then((res) => {
        if (!res.ok) {
          throw new Error('Unable to load mood log');
        }
        return res.json();
      })
      .then((data) => {
        const dateIdx = data.columns.indexOf('Date');
        const focusIdx = data.columns.indexOf('Focus');
        const points = data.rows.map((row) => ({
          label: (row[dateIdx] || '').slice(5),
          value: Number(row[focusIdx]) || 0
        }));
        renderFocusChart(points);
      })
      .catch(() => renderFocusChart([]));
  </script>
"#;
