use browser_core::{CompanyId, CompanyListView, Msg};

pub const HELP: &str = "\
Commands:
  search <text>              filter by ticker or name
  clear                      drop the search text
  exchange <code|all>        filter by exchange
  sector <name|all>          filter by sector
  show <all|selected|unselected>
  page <n> | next | prev     move between pages
  toggle <row|id>            flip the selected flag
  select <row|id>            mark for data collection
  deselect <row|id>          unmark
  info <row|id>              show one company in full
  selections                 list every selected company
  reload                     re-run the current search
  dismiss                    hide the error message
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    ShowCompany(CompanyId),
    ShowSelections,
    ShowHelp,
    Quit,
    Invalid(String),
}

/// Parses one line of user input. Blank lines yield `None`.
///
/// Row references are 1-based positions in the current table; anything that
/// is not purely numeric is taken as a company id.
pub fn parse_command(line: &str, view: &CompanyListView) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Dispatch(Msg::SearchChanged(rest.to_string())),
        "clear" => Command::Dispatch(Msg::SearchChanged(String::new())),
        "exchange" => Command::Dispatch(Msg::ExchangeChanged(optional_choice(rest))),
        "sector" => Command::Dispatch(Msg::SectorChanged(optional_choice(rest))),
        "show" => match rest.to_ascii_lowercase().as_str() {
            "" | "all" => Command::Dispatch(Msg::SelectionFilterChanged(None)),
            "selected" => Command::Dispatch(Msg::SelectionFilterChanged(Some(true))),
            "unselected" => Command::Dispatch(Msg::SelectionFilterChanged(Some(false))),
            other => Command::Invalid(format!("unknown filter '{other}'")),
        },
        "page" => match rest.parse::<u32>() {
            Ok(page) if page >= 1 => Command::Dispatch(Msg::PageChanged(page)),
            _ => Command::Invalid(format!("'{rest}' is not a page number")),
        },
        "next" | "n" => Command::Dispatch(Msg::NextPage),
        "prev" | "p" => Command::Dispatch(Msg::PreviousPage),
        "toggle" | "t" => with_company(rest, view, |company_id| {
            Command::Dispatch(Msg::ToggleSelection { company_id })
        }),
        "select" => with_company(rest, view, |company_id| {
            Command::Dispatch(Msg::SetSelection {
                company_id,
                selected: true,
            })
        }),
        "deselect" => with_company(rest, view, |company_id| {
            Command::Dispatch(Msg::SetSelection {
                company_id,
                selected: false,
            })
        }),
        "info" => with_company(rest, view, Command::ShowCompany),
        "selections" => Command::ShowSelections,
        "reload" | "r" => Command::Dispatch(Msg::ReloadRequested),
        "dismiss" => Command::Dispatch(Msg::ErrorDismissed),
        "help" | "?" => Command::ShowHelp,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{other}'; try 'help'")),
    };
    Some(command)
}

fn optional_choice(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value.to_string())
    }
}

fn with_company(
    reference: &str,
    view: &CompanyListView,
    build: impl FnOnce(CompanyId) -> Command,
) -> Command {
    match resolve_company(reference, view) {
        Ok(company_id) => build(company_id),
        Err(message) => Command::Invalid(message),
    }
}

fn resolve_company(reference: &str, view: &CompanyListView) -> Result<CompanyId, String> {
    if reference.is_empty() {
        return Err("expected a row number or company id".to_string());
    }
    if !reference.bytes().all(|byte| byte.is_ascii_digit()) {
        return Ok(reference.to_string());
    }
    reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| view.rows.get(idx))
        .map(|row| row.company_id.clone())
        .ok_or_else(|| format!("no such row {reference}"))
}
