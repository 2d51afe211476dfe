use crate::auth::{AuthController, AuthMode, PASSWORD_MAX, PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN};
use crate::dates::{day_of_month, month_label, parse_day};
use crate::home::HomeView;
use crate::models::{Mood, MoodEntry, WeeklyStats};
use crate::mood::{MoodController, PastMoodController, NOTE_MAX};
use crate::profile::{ProfileController, GENDER_MAX};
use crate::session::Session;
use crate::stats::{summary_line, StatsController};
use crate::views::{View, ViewState};
use askama::Template;

pub struct NavLink {
    pub path: &'static str,
    pub title: &'static str,
    pub active: bool,
}

pub struct Nav {
    pub links: Vec<NavLink>,
    pub user: String,
}

fn nav(active: View, session: &Session) -> Option<Nav> {
    let links = View::NAV
        .into_iter()
        .map(|view| NavLink {
            path: view.path(),
            title: view.title(),
            active: view == active,
        })
        .collect();
    Some(Nav {
        links,
        user: session.display_name().to_string(),
    })
}

fn errors<'a>(messages: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    messages.into_iter().flatten().map(str::to_string).collect()
}

pub struct MoodChoice {
    pub value: u8,
    pub emoji: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

fn mood_choices(selected: Option<Mood>) -> Vec<MoodChoice> {
    Mood::ALL
        .into_iter()
        .map(|mood| MoodChoice {
            value: mood.value(),
            emoji: mood.emoji(),
            label: mood.label(),
            checked: selected == Some(mood),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "auth.html")]
struct AuthPage<'a> {
    title: &'static str,
    nav: Option<Nav>,
    login_user: &'a str,
    register_user: &'a str,
    login_error: Option<&'a str>,
    register_error: Option<&'a str>,
    username_min: usize,
    username_max: usize,
    password_min: usize,
    password_max: usize,
}

pub fn render_auth(form: &AuthController) -> Result<String, askama::Error> {
    let (login_user, register_user, login_error, register_error) = match form.mode {
        AuthMode::Login => (form.username.as_str(), "", form.state.error(), None),
        AuthMode::Register => ("", form.username.as_str(), None, form.state.error()),
    };
    AuthPage {
        title: View::Auth.title(),
        nav: None,
        login_user,
        register_user,
        login_error,
        register_error,
        username_min: USERNAME_MIN,
        username_max: USERNAME_MAX,
        password_min: PASSWORD_MIN,
        password_max: PASSWORD_MAX,
    }
    .render()
}

pub struct CalendarDay {
    pub date: String,
    pub label: &'static str,
    pub number: u32,
    pub mark: &'static str,
    pub today: bool,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage {
    title: &'static str,
    nav: Option<Nav>,
    name: String,
    month: Option<String>,
    days: Vec<CalendarDay>,
    errors: Vec<String>,
    ready: bool,
    logged_today: bool,
    missing: usize,
    reminder: Option<String>,
    mood_path: &'static str,
    saved_path: &'static str,
    stats_path: &'static str,
    past_path: &'static str,
}

pub fn render_home(session: &Session, state: &ViewState<HomeView>) -> Result<String, askama::Error> {
    let mut page = HomePage {
        title: View::Home.title(),
        nav: nav(View::Home, session),
        name: session.display_name().to_string(),
        month: None,
        days: Vec::new(),
        errors: errors([state.error()]),
        ready: false,
        logged_today: false,
        missing: 0,
        reminder: None,
        mood_path: View::Mood.path(),
        saved_path: View::SavedMood.path(),
        stats_path: View::Statistic.path(),
        past_path: View::PastMood.path(),
    };

    if let Some(home) = state.ready() {
        page.ready = true;
        page.month = parse_day(&home.today).map(month_label);
        page.days = home
            .week
            .iter()
            .map(|item| CalendarDay {
                date: item.date.clone(),
                label: item.day_name.short(),
                number: day_of_month(&item.date),
                mark: item.mood.and_then(Mood::from_value).map(Mood::emoji).unwrap_or("\u{b7}"),
                today: item.date == home.today,
            })
            .collect();
        if home.week.is_empty() {
            page.errors = errors([home.week_error.as_deref().or(Some("No days to show yet."))]);
        }
        page.logged_today = home.logged_today();
        page.missing = home.missing.len();
        page.reminder = home.reminder.clone();
    }
    page.render()
}

#[derive(Template)]
#[template(path = "mood.html")]
struct MoodPage {
    title: &'static str,
    nav: Option<Nav>,
    hero: &'static str,
    action: &'static str,
    choices: Vec<MoodChoice>,
    note_max: usize,
    errors: Vec<String>,
}

pub fn render_mood(session: &Session, picker: &MoodController) -> Result<String, askama::Error> {
    MoodPage {
        title: View::Mood.title(),
        nav: nav(View::Mood, session),
        hero: Mood::Happy.emoji(),
        action: View::Mood.path(),
        choices: mood_choices(picker.selected),
        note_max: NOTE_MAX,
        errors: errors([picker.state.error()]),
    }
    .render()
}

pub struct SavedEntry {
    pub emoji: &'static str,
    pub label: String,
    pub date: String,
    pub reason: Option<String>,
}

#[derive(Template)]
#[template(path = "saved.html")]
struct SavedPage {
    title: &'static str,
    nav: Option<Nav>,
    entry: Option<SavedEntry>,
    home_path: &'static str,
}

pub fn render_saved(view: View, session: &Session, entry: Option<&MoodEntry>) -> Result<String, askama::Error> {
    SavedPage {
        title: view.title(),
        nav: nav(view, session),
        entry: entry.map(|entry| SavedEntry {
            emoji: entry.mood.emoji(),
            label: entry.mood.label().to_lowercase(),
            date: entry.date.clone(),
            reason: entry.reason.clone(),
        }),
        home_path: View::Home.path(),
    }
    .render()
}

pub struct DateOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "past_mood.html")]
struct PastMoodPage {
    title: &'static str,
    nav: Option<Nav>,
    nothing_to_fill: bool,
    action: &'static str,
    dates: Vec<DateOption>,
    choices: Vec<MoodChoice>,
    note_max: usize,
    errors: Vec<String>,
    home_path: &'static str,
    mood_path: &'static str,
}

pub fn render_past_mood(session: &Session, picker: &PastMoodController) -> Result<String, askama::Error> {
    PastMoodPage {
        title: View::PastMood.title(),
        nav: nav(View::PastMood, session),
        nothing_to_fill: picker.nothing_to_fill(),
        action: View::PastMood.path(),
        dates: picker
            .missing
            .iter()
            .map(|date| DateOption {
                value: date.clone(),
                selected: picker.selected_date.as_deref() == Some(date.as_str()),
            })
            .collect(),
        choices: mood_choices(picker.selected_mood),
        note_max: NOTE_MAX,
        errors: errors([picker.week.error(), picker.save.error()]),
        home_path: View::Home.path(),
        mood_path: View::Mood.path(),
    }
    .render()
}

pub struct WeekOption {
    pub number: u32,
    pub selected: bool,
}

pub struct Bar {
    pub category: String,
    pub width: String,
    pub percent: String,
}

pub struct StatsCard {
    pub summary: String,
    pub average: Option<String>,
    pub bars: Vec<Bar>,
    pub comment: Option<String>,
    pub activities: Vec<String>,
}

impl From<&WeeklyStats> for StatsCard {
    fn from(stats: &WeeklyStats) -> Self {
        Self {
            summary: summary_line(stats),
            average: stats.average_score.map(|avg| format!("{avg:.1}")),
            bars: stats
                .breakdown
                .iter()
                .map(|share| Bar {
                    category: share.category.clone(),
                    width: format!("{:.1}", share.percent.clamp(0.0, 100.0)),
                    percent: format!("{:.1}", share.percent),
                })
                .collect(),
            comment: stats.ai_comment.clone(),
            activities: stats.activities.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "stats.html")]
struct StatsPage {
    title: &'static str,
    nav: Option<Nav>,
    action: &'static str,
    weeks: Vec<WeekOption>,
    refreshing: bool,
    stats: Option<StatsCard>,
    errors: Vec<String>,
}

pub fn render_stats(session: &Session, view: &StatsController) -> Result<String, askama::Error> {
    StatsPage {
        title: View::Statistic.title(),
        nav: nav(View::Statistic, session),
        action: View::Statistic.path(),
        weeks: view
            .week_options()
            .into_iter()
            .map(|number| WeekOption {
                number,
                selected: view.selected_week == Some(number),
            })
            .collect(),
        refreshing: view.state.is_loading(),
        stats: view.visible().map(StatsCard::from),
        errors: errors([view.state.error()]),
    }
    .render()
}

pub struct ProfileDetails {
    pub username: String,
    pub since: String,
    pub birth_date: String,
    pub gender: String,
    pub hobbies: String,
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfilePage {
    title: &'static str,
    nav: Option<Nav>,
    action: &'static str,
    details: Option<ProfileDetails>,
    gender_max: usize,
    saved: bool,
    errors: Vec<String>,
}

pub fn render_profile(session: &Session, profile: &ProfileController) -> Result<String, askama::Error> {
    let details = profile.state.ready().map(|view| ProfileDetails {
        username: view.user.username.clone(),
        since: view
            .user
            .created_at
            .as_deref()
            .and_then(|created| created.get(..10))
            .unwrap_or("-")
            .to_string(),
        birth_date: view.info.birth_date.clone().unwrap_or_default(),
        gender: view.info.gender.clone().unwrap_or_default(),
        hobbies: view.info.hobbies.join(", "),
    });
    ProfilePage {
        title: View::Profile.title(),
        nav: nav(View::Profile, session),
        action: View::Profile.path(),
        details,
        gender_max: GENDER_MAX,
        saved: profile.save.ready().is_some(),
        errors: errors([profile.state.error(), profile.save.error()]),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryShare, DayName, UserProfile, WeekItem};

    fn session() -> Session {
        Session::new(
            "u-1",
            None,
            Some(UserProfile {
                id: "u-1".into(),
                username: "<dina>".into(),
                created_at: None,
            }),
        )
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_home(&session(), &ViewState::Loading).unwrap();
        assert!(html.contains("Hi, &lt;dina&gt;"));
        assert!(!html.contains("<dina>"));
    }

    #[test]
    fn ai_comment_is_escaped() {
        let view = StatsController {
            current_week: Some(1),
            selected_week: Some(1),
            placeholder: None,
            state: ViewState::Ready(WeeklyStats {
                week_number: 1,
                completed: true,
                average_score: Some(3.0),
                entries_count: 7,
                breakdown: vec![CategoryShare {
                    category: "JOY".into(),
                    percent: 100.0,
                }],
                ai_comment: Some("<script>alert(1)</script>".into()),
                activities: vec!["Rest & read".into()],
            }),
        };
        let html = render_stats(&session(), &view).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Rest &amp; read"));
        assert!(!html.contains("Refreshing"));
    }

    #[test]
    fn home_shows_reminder_dialog_only_when_due() {
        let mut home = HomeView {
            today: "2025-11-23".into(),
            week: vec![WeekItem {
                date: "2025-11-23".into(),
                day_name: DayName::Sunday,
                week_number: 1,
                mood: Some(4),
                created_at: None,
            }],
            week_error: None,
            missing: vec!["2025-11-22".into()],
            reminder: None,
            last_entry: None,
        };
        let html = render_home(&session(), &ViewState::Ready(home.clone())).unwrap();
        assert!(!html.contains("role=\"dialog\""));
        assert!(html.contains("Missed days: 1"));
        assert!(html.contains(View::SavedMood.path()));

        home.reminder = Some("2025-11-22".into());
        let html = render_home(&session(), &ViewState::Ready(home)).unwrap();
        assert!(html.contains("role=\"dialog\""));
        assert!(html.contains("value=\"2025-11-22\""));
        assert!(html.contains(&format!("name=\"next\" value=\"{}\"", View::PastMood.path())));
    }

    #[test]
    fn placeholder_renders_while_refreshing() {
        let view = StatsController {
            current_week: Some(2),
            selected_week: Some(2),
            placeholder: Some(WeeklyStats {
                week_number: 2,
                completed: false,
                average_score: None,
                entries_count: 3,
                breakdown: Vec::new(),
                ai_comment: None,
                activities: Vec::new(),
            }),
            state: ViewState::Loading,
        };
        let html = render_stats(&session(), &view).unwrap();
        assert!(html.contains("Refreshing"));
        assert!(html.contains("Week 2 is not complete yet: 3 of 7 days logged."));
    }

    #[test]
    fn auth_error_lands_on_the_submitted_form() {
        let mut form = AuthController::new(AuthMode::Login);
        form.username = "ab".into();
        form.state = ViewState::Failed("Username must be between 3 and 50 characters.".into());
        let html = render_auth(&form).unwrap();
        let login_at = html.find("/auth/login").unwrap();
        let error_at = html.find("between 3 and 50 characters").unwrap();
        assert!(error_at > login_at);
    }
}
