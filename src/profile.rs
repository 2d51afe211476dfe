use crate::dates::parse_day;
use crate::errors::ClientError;
use crate::fetch::FetchKind;
use crate::models::{UserInfo, UserProfile};
use crate::session::Session;
use crate::state::AppState;
use crate::views::ViewState;
use validator::{Validate, ValidationError};

pub const GENDER_MAX: usize = 20;
pub const HOBBY_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user: UserProfile,
    pub info: UserInfo,
}

/// The profile form after trimming; blank fields are cleared.
#[derive(Debug, Validate)]
struct InfoForm {
    #[validate(custom(function = "validate_birth_date"))]
    birth_date: Option<String>,
    #[validate(length(max = 20, message = "Gender must be at most 20 characters."))]
    gender: Option<String>,
    #[validate(custom(function = "validate_hobbies"))]
    hobbies: Vec<String>,
}

fn validate_birth_date(birth_date: &str) -> Result<(), ValidationError> {
    if birth_date.len() == 10 && parse_day(birth_date).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("birth_date_format")
        .with_message("Birth date must look like YYYY-MM-DD.".into()))
}

fn validate_hobbies(hobbies: &[String]) -> Result<(), ValidationError> {
    match hobbies.iter().find(|hobby| hobby.chars().count() > HOBBY_MAX) {
        Some(hobby) => Err(ValidationError::new("hobby_length").with_message(
            format!("Hobby \"{hobby}\" is longer than {HOBBY_MAX} characters.").into(),
        )),
        None => Ok(()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Builds `UserInfo` from the profile form. Hobbies are comma separated.
pub fn parse_info_form(birth_date: &str, gender: &str, hobbies: &str) -> Result<UserInfo, ClientError> {
    let form = InfoForm {
        birth_date: non_blank(birth_date),
        gender: non_blank(gender),
        hobbies: hobbies.split(',').filter_map(non_blank).collect(),
    };
    form.validate()?;

    Ok(UserInfo {
        birth_date: form.birth_date,
        gender: form.gender,
        hobbies: form.hobbies,
    })
}

#[derive(Default)]
pub struct ProfileController {
    pub state: ViewState<ProfileView>,
    pub save: ViewState<UserInfo>,
}

impl ProfileController {
    pub async fn load(&mut self, app: &AppState, session: &Session) {
        self.state.begin();
        let api = app.api.clone();
        let user_id = session.user_id.clone();
        let token = session.token.clone();
        let slot = app.fetches.slot(FetchKind::Profile).await;

        let result = slot
            .run(async move {
                let user = api.user(&user_id, token.as_deref()).await?;
                let info = match api.user_info(&user_id, token.as_deref()).await {
                    Ok(info) => info,
                    Err(err) if err.is_not_found() => UserInfo::default(),
                    Err(err) => return Err(err),
                };
                Ok(ProfileView { user, info })
            })
            .await;

        if let Ok(view) = &result {
            app.store.remember_user(&view.user).await;
        }
        self.state.finish(result);
    }

    pub async fn update(
        &mut self,
        app: &AppState,
        session: &Session,
        birth_date: &str,
        gender: &str,
        hobbies: &str,
    ) {
        let info = match parse_info_form(birth_date, gender, hobbies) {
            Ok(info) => info,
            Err(err) => {
                self.save.fail(err);
                return;
            }
        };

        self.save.begin();
        let result = app
            .api
            .update_user_info(&session.user_id, session.token(), &info)
            .await;
        self.save.finish(result);
    }
}
