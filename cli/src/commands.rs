use clubboard_core::validation::validate_code;
use clubboard_core::{
    AccountError, AccountService, AppConfig, GoTrueClient, LeaderboardPage, LeaderboardRequest,
    ProfileStore, RestStore, SignInForm, SignUpForm, SignUpResult,
};
use clubboard_types::{FilterState, LabelDomain, LeaderboardEntry, ProfileUpdate, SortColumn, SortState};

use crate::{Prompt, Terminal};
use crate::session_file::SessionFile;

pub type Accounts = AccountService<GoTrueClient, RestStore>;

/// Backend clients plus the on-disk session.
pub struct Context {
    pub config: AppConfig,
    pub accounts: Accounts,
    pub session_file: SessionFile,
}

impl Context {
    pub fn new(config: AppConfig, session_file: SessionFile) -> Result<Self, String> {
        config.validate().map_err(|e| {
            format!("{e}\nSet it with `clubboard config --url <URL> --anon-key <KEY>`")
        })?;
        let auth = GoTrueClient::new(config.supabase.clone()).map_err(|e| e.to_string())?;
        let store = RestStore::new(config.supabase.clone()).map_err(|e| e.to_string())?;
        let state = clubboard_core::AuthState::global().clone();
        Ok(Self {
            config,
            accounts: AccountService::new(auth, store, state),
            session_file,
        })
    }

    /// Re-establish the saved session, if there is one and it is still valid.
    pub async fn restore_session(&self) -> Result<bool, String> {
        let Some(saved) = self.session_file.load().map_err(|e| e.to_string())? else {
            return Ok(false);
        };
        match self.accounts.restore(saved).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::info!(error = %e, "saved session rejected");
                self.session_file.clear().map_err(|e| e.to_string())?;
                Ok(false)
            }
        }
    }

    fn persist_session(&self) -> Result<(), String> {
        match self.accounts.session() {
            Some(session) => self.session_file.save(&session),
            None => self.session_file.clear(),
        }
        .map_err(|e| e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Leaderboard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LeaderboardOptions {
    pub search: String,
    pub years: Vec<String>,
    pub majors: Vec<String>,
    pub clubs: Vec<String>,
    pub sort: Option<SortColumn>,
    /// `None` uses the column's first-click direction.
    pub ascending: Option<bool>,
    pub page: u32,
}

impl LeaderboardOptions {
    /// Resolve labels or codes into a request. Unknown filter values are an
    /// error rather than a silently empty result.
    pub fn to_request(&self, page_size: usize) -> Result<LeaderboardRequest, String> {
        let mut filters = FilterState::default();
        for (domain, values) in [
            (LabelDomain::Year, &self.years),
            (LabelDomain::Major, &self.majors),
            (LabelDomain::Club, &self.clubs),
        ] {
            for value in values {
                let code = validate_code(domain, value).map_err(|e| e.to_string())?;
                if !filters.is_selected(domain, &code) {
                    filters.toggle_label(domain, &code);
                }
            }
        }

        let sort = match self.sort {
            Some(column) => SortState {
                column,
                ascending: self.ascending.unwrap_or(column.first_click_ascending()),
            },
            None => {
                let default = SortState::default();
                SortState {
                    ascending: self.ascending.unwrap_or(default.ascending),
                    ..default
                }
            }
        };

        Ok(LeaderboardRequest {
            filters,
            sort,
            search: self.search.clone(),
            page: self.page.max(1),
            page_size,
        })
    }
}

pub async fn leaderboard(ctx: &Context, options: &LeaderboardOptions) -> Result<(), String> {
    let request = options.to_request(ctx.config.leaderboard.page_size)?;
    let rows = ctx
        .accounts
        .store()
        .select_leaderboard(&request.to_query())
        .await
        .map_err(|e| format!("Failed to load leaderboard: {e}"))?;
    let page = LeaderboardPage::from_rows(rows, request.rows_per_page());
    print!("{}", render_page(&page, request.page, request.offset()));
    Ok(())
}

/// Plain-text table with a rank column and a paging footer.
pub fn render_page(page: &LeaderboardPage, page_number: u32, offset: usize) -> String {
    if page.rows.is_empty() {
        return "No data available\n".to_string();
    }
    let cells = |e: &LeaderboardEntry| {
        [
            e.username.clone(),
            e.year_label().to_string(),
            e.major_label().to_string(),
            e.club_label().to_string(),
            e.num_events_attended.to_string(),
        ]
    };
    let headers = SortColumn::ALL.map(|c| c.title().to_string());
    let rows: Vec<[String; 5]> = page.rows.iter().map(cells).collect();

    let mut widths = headers.clone().map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let rank_width = (offset + rows.len()).to_string().len().max(1);

    let line = |rank: &str, cols: &[String; 5]| {
        let mut out = format!("{rank:>rank_width$}");
        for (cell, w) in cols.iter().zip(widths) {
            out.push_str(&format!("  {cell:<w$}"));
        }
        out.trim_end().to_string() + "\n"
    };

    let mut out = line("#", &headers);
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&line(&(offset + i + 1).to_string(), row));
    }
    out.push_str(&format!(
        "\nPage {page_number}{}\n",
        if page.has_next_page { " (more with --page)" } else { "" }
    ));
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

fn value_or_prompt(
    value: Option<String>,
    prompt: &mut impl Prompt,
    question: &str,
) -> Result<String, String> {
    match value {
        Some(v) => Ok(v),
        None => prompt.line(question),
    }
}

pub fn sign_in_form(email: Option<String>, prompt: &mut impl Prompt) -> Result<SignInForm, String> {
    Ok(SignInForm {
        email: value_or_prompt(email, prompt, "Email")?,
        password: prompt.secret("Password")?,
    })
}

pub async fn sign_in(ctx: &Context, email: Option<String>) -> Result<(), String> {
    let form = sign_in_form(email, &mut Terminal)?;
    let session = ctx
        .accounts
        .sign_in(&form)
        .await
        .map_err(|e| e.to_string())?;
    ctx.persist_session()?;
    println!(
        "Signed in as {}",
        session.user.email.as_deref().unwrap_or(&session.user.id)
    );
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignUpOptions {
    pub username: Option<String>,
    pub email: Option<String>,
    pub year: Option<String>,
    pub major: Option<String>,
    pub club: Option<String>,
}

fn choices(domain: LabelDomain) -> String {
    domain.labels().collect::<Vec<_>>().join(", ")
}

pub fn sign_up_form(options: SignUpOptions, prompt: &mut impl Prompt) -> Result<SignUpForm, String> {
    Ok(SignUpForm {
        username: value_or_prompt(options.username, prompt, "Username")?,
        password: prompt.secret("Password")?,
        email: value_or_prompt(options.email, prompt, "Email")?,
        year: value_or_prompt(
            options.year,
            prompt,
            &format!("Year ({})", choices(LabelDomain::Year)),
        )?,
        major: value_or_prompt(
            options.major,
            prompt,
            &format!("Major ({})", choices(LabelDomain::Major)),
        )?,
        main_club: value_or_prompt(
            options.club,
            prompt,
            &format!("Main club ({})", choices(LabelDomain::Club)),
        )?,
    })
}

pub async fn sign_up(ctx: &Context, options: SignUpOptions) -> Result<(), String> {
    let form = sign_up_form(options, &mut Terminal)?;
    let result = ctx.accounts.sign_up(&form).await;
    if let Err(e @ AccountError::ProfileNotCreated(_)) = &result {
        ctx.persist_session()?;
        return Err(format!("{e}\nRun `clubboard profile show` to retry."));
    }
    match result.map_err(|e| e.to_string())? {
        SignUpResult::SignedIn(profile) => {
            ctx.persist_session()?;
            println!("Welcome, {}! You are signed in.", profile.username);
        }
        SignUpResult::ConfirmationPending { email } => {
            println!("We sent a confirmation link to {email}. Follow it, then run `clubboard sign-in`.");
        }
    }
    Ok(())
}

pub async fn sign_out(ctx: &Context) -> Result<(), String> {
    ctx.restore_session().await?;
    ctx.accounts.sign_out().await;
    ctx.persist_session()?;
    println!("Signed out");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

pub async fn profile_show(ctx: &Context) -> Result<(), String> {
    ctx.restore_session().await?;
    let profile = ctx.accounts.load_profile().await.map_err(|e| e.to_string())?;
    println!("Username:        {}", profile.username);
    println!("Events attended: {}", profile.num_events_attended);
    println!("Year:            {}", LabelDomain::Year.label(&profile.year));
    println!("Major:           {}", LabelDomain::Major.label(&profile.major));
    println!("Main club:       {}", LabelDomain::Club.label(&profile.main_club));
    Ok(())
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub username: Option<String>,
    pub year: Option<String>,
    pub major: Option<String>,
    pub club: Option<String>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.year.is_none() && self.major.is_none() && self.club.is_none()
    }

    pub fn merge_into(self, mut update: ProfileUpdate) -> ProfileUpdate {
        if let Some(v) = self.username {
            update.username = v;
        }
        if let Some(v) = self.year {
            update.year = v;
        }
        if let Some(v) = self.major {
            update.major = v;
        }
        if let Some(v) = self.club {
            update.main_club = v;
        }
        update
    }
}

pub async fn profile_edit(ctx: &Context, edit: ProfileEdit) -> Result<(), String> {
    if edit.is_empty() {
        return Err("Nothing to change. Pass --username, --year, --major or --club.".to_string());
    }
    ctx.restore_session().await?;
    let current = ctx.accounts.load_profile().await.map_err(|e| e.to_string())?;
    let update = edit.merge_into(current.to_update());
    let saved = ctx
        .accounts
        .save_profile(&update)
        .await
        .map_err(|e| e.to_string())?;
    println!("Profile saved for {}", saved.username);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ConfigChanges {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub page_size: Option<usize>,
}

/// Apply any changes, save, and print the effective settings.
pub fn config(changes: ConfigChanges) -> Result<(), String> {
    let mut config = AppConfig::load().map_err(|e| e.to_string())?;
    let changed = changes.url.is_some() || changes.anon_key.is_some() || changes.page_size.is_some();
    if let Some(url) = changes.url {
        config.supabase.url = url;
    }
    if let Some(key) = changes.anon_key {
        config.supabase.anon_key = key;
    }
    if let Some(size) = changes.page_size {
        config.leaderboard.page_size = size;
    }
    if changed {
        config.validate().map_err(|e| e.to_string())?;
        config.save().map_err(|e| e.to_string())?;
    }

    let path = AppConfig::path().map_err(|e| e.to_string())?;
    println!("Config file: {}", path.display());
    println!("supabase.url = {:?}", config.supabase.url);
    println!(
        "supabase.anon_key = {}",
        if config.supabase.anon_key.is_empty() { "(not set)" } else { "(set)" }
    );
    println!("leaderboard.page_size = {}", config.leaderboard.page_size);
    println!(
        "leaderboard.search_debounce_ms = {}",
        config.leaderboard.search_debounce_ms
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, events: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            username: name.into(),
            num_events_attended: events,
            main_club: "colorstack".into(),
            major: "computer-science".into(),
            year: "junior".into(),
        }
    }

    #[test]
    fn test_options_accept_labels_and_codes() {
        let options = LeaderboardOptions {
            years: vec!["Junior".into(), "junior".into()],
            clubs: vec!["black-engineers-society".into()],
            sort: Some(SortColumn::Username),
            page: 0,
            ..Default::default()
        };
        let request = options.to_request(20).unwrap();
        assert_eq!(request.filters.year.len(), 1);
        assert!(request.filters.club.contains("black-engineers-society"));
        assert_eq!(
            request.sort,
            SortState {
                column: SortColumn::Username,
                ascending: true,
            }
        );
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_options_reject_unknown_label() {
        let options = LeaderboardOptions {
            majors: vec!["Underwater Basket Weaving".into()],
            ..Default::default()
        };
        assert!(options.to_request(20).unwrap_err().contains("Underwater Basket Weaving"));
    }

    #[test]
    fn test_default_sort_direction_override() {
        let options = LeaderboardOptions {
            ascending: Some(true),
            ..Default::default()
        };
        let sort = options.to_request(20).unwrap().sort;
        assert_eq!(sort.column, SortColumn::NumEventsAttended);
        assert!(sort.ascending);
    }

    #[test]
    fn test_render_page_ranks_from_offset() {
        let page = LeaderboardPage {
            rows: vec![entry("ada", 12), entry("grace", 9)],
            has_next_page: true,
        };
        let text = render_page(&page, 2, 20);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(" #"));
        assert!(lines[1].starts_with("21  ada"));
        assert!(lines[1].contains("Computer Science"));
        assert!(lines[1].ends_with("12"));
        assert!(lines[2].starts_with("22  grace"));
        assert!(text.contains("Page 2 (more with --page)"));
    }

    #[test]
    fn test_render_empty_page() {
        assert_eq!(render_page(&LeaderboardPage::default(), 1, 0), "No data available\n");
    }

    /// Canned answers; records which questions were asked hidden.
    #[derive(Default)]
    struct Scripted {
        lines: Vec<&'static str>,
        secrets: Vec<&'static str>,
        hidden: Vec<String>,
    }

    impl Prompt for Scripted {
        fn line(&mut self, prompt: &str) -> Result<String, String> {
            assert!(!prompt.contains("Password"), "{prompt} asked visibly");
            Ok(self.lines.remove(0).to_string())
        }

        fn secret(&mut self, prompt: &str) -> Result<String, String> {
            self.hidden.push(prompt.to_string());
            Ok(self.secrets.remove(0).to_string())
        }
    }

    #[test]
    fn test_sign_in_reads_password_hidden() {
        let mut prompt = Scripted {
            lines: vec!["ada@example.com"],
            secrets: vec!["secret1"],
            ..Default::default()
        };
        let form = sign_in_form(None, &mut prompt).unwrap();
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.password, "secret1");
        assert_eq!(prompt.hidden, vec!["Password"]);
        assert!(prompt.lines.is_empty());
    }

    #[test]
    fn test_sign_up_reads_password_hidden() {
        let mut prompt = Scripted {
            lines: vec!["ada@example.com", "Junior"],
            secrets: vec!["secret1"],
            ..Default::default()
        };
        let options = SignUpOptions {
            username: Some("ada".into()),
            major: Some("Math".into()),
            club: Some("ColorStack".into()),
            ..Default::default()
        };
        let form = sign_up_form(options, &mut prompt).unwrap();
        assert_eq!(form.username, "ada");
        assert_eq!(form.password, "secret1");
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.year, "Junior");
        assert_eq!(form.main_club, "ColorStack");
        assert_eq!(prompt.hidden, vec!["Password"]);
    }

    #[test]
    fn test_profile_edit_merges() {
        let base = ProfileUpdate {
            username: "ada".into(),
            year: "junior".into(),
            major: "math".into(),
            main_club: "codeblack".into(),
        };
        let edit = ProfileEdit {
            major: Some("Computer Science".into()),
            ..Default::default()
        };
        assert!(!edit.is_empty());
        let merged = edit.merge_into(base.clone());
        assert_eq!(merged.major, "Computer Science");
        assert_eq!(merged.username, base.username);
        assert!(ProfileEdit::default().is_empty());
    }
}
