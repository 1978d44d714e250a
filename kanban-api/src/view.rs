/// Board page rendering
///
/// The whole UI is one page: the signed-in user's name, three lanes of
/// tasks, and the forms that drive every other route. Pages are assembled
/// with a small string builder; every user-supplied value passes through
/// [`escape`].
///
/// Each lane carries `data-category` and `data-count` attributes so the page
/// can be inspected without parsing the task markup.

use kanban_shared::board::Board;
use kanban_shared::models::{Category, Task};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
    .lanes{display:flex;gap:1rem}\
    .lane{flex:1;background:#f4f5f7;border-radius:6px;padding:.5rem}\
    .task{background:#fff;border-radius:4px;padding:.5rem;margin:.5rem 0}\
    .task p{color:#555;white-space:pre-wrap}\
    form{margin:.5rem 0}";

/// Who the page is rendered for
#[derive(Debug, Clone, Copy)]
pub enum Viewer<'a> {
    /// No live session
    Anonymous,

    /// Signed-in user with this display name
    User(&'a str),
}

impl Viewer<'_> {
    fn display_name(&self) -> &str {
        match self {
            Viewer::Anonymous => "",
            Viewer::User(name) => name,
        }
    }
}

/// Renders the full board page
pub fn render_board(viewer: Viewer<'_>, board: &Board) -> String {
    let mut page = String::with_capacity(4096);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Kanban</title>\n");
    let _ = writeln!(page, "<style>{}</style>", STYLE);
    page.push_str("</head>\n<body>\n<header>\n");
    let _ = writeln!(
        page,
        "<h1>Kanban</h1>\n<p>Signed in as: <span class=\"display-name\">{}</span></p>",
        escape(viewer.display_name())
    );

    match viewer {
        Viewer::Anonymous => render_auth_forms(&mut page),
        Viewer::User(_) => render_task_form(&mut page),
    }
    page.push_str("</header>\n<main class=\"lanes\">\n");

    for category in Category::ALL {
        render_lane(&mut page, category, board.lane(category));
    }

    page.push_str("</main>\n</body>\n</html>\n");
    page
}

fn render_auth_forms(page: &mut String) {
    page.push_str(
        "<form method=\"post\" action=\"/login\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <form method=\"post\" action=\"/register\">\n\
         <input name=\"name\" placeholder=\"Name\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n",
    );
}

fn render_task_form(page: &mut String) {
    page.push_str(
        "<form method=\"post\" action=\"/add\">\n\
         <input name=\"title\" placeholder=\"Title\">\n\
         <input name=\"description\" placeholder=\"Description\">\n\
         <select name=\"category\">\n",
    );
    for category in Category::ALL {
        let _ = writeln!(
            page,
            "<option value=\"{}\">{}</option>",
            category.as_str(),
            category.label()
        );
    }
    page.push_str(
        "</select>\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n\
         <a href=\"/logout\">Log out</a>\n",
    );
}

fn render_lane(page: &mut String, category: Category, tasks: &[Task]) {
    let _ = writeln!(
        page,
        "<section class=\"lane\" data-category=\"{}\" data-count=\"{}\">\n<h2>{}</h2>",
        category.as_str(),
        tasks.len(),
        category.label()
    );

    for task in tasks {
        let _ = writeln!(
            page,
            "<article class=\"task\" data-task-id=\"{id}\">\n\
             <h3>{title}</h3>\n<p>{description}</p>\n\
             <a href=\"/updatel/{id}\" title=\"Move left\">&larr;</a>\n\
             <a href=\"/updater/{id}\" title=\"Move right\">&rarr;</a>\n\
             <a href=\"/delete/{id}\" title=\"Delete\">Delete</a>\n\
             </article>",
            id = task.id,
            title = escape(&task.title),
            description = escape(&task.description),
        );
    }

    page.push_str("</section>\n");
}

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
