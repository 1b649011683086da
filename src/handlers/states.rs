use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::Update,
    utils::command::{BotCommands, ParseError},
};

use super::{admin, callbacks, renter};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Renter conversation. `/end` returns to `Idle` from anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingConfirmation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    End,
    Text(String),
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Welcome,
    RecordPhone(String),
    Close,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub effect: Effect,
}

/// An event that has no meaning in the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejected {
    AlreadyStarted,
    NotStarted,
    ExpectedPhone,
    AwaitingOutcome,
}

impl Rejected {
    pub fn hint(self) -> &'static str {
        match self {
            Rejected::AlreadyStarted => {
                "A request is already in progress. Send /end to finish it first."
            }
            Rejected::NotStarted => "Send /start to begin.",
            Rejected::ExpectedPhone => "Please send the phone number as a text message.",
            Rejected::AwaitingOutcome => {
                "Your request is being processed. Use the buttons above or send /end."
            }
        }
    }
}

impl State {
    pub fn on(self, event: Event) -> Result<Transition, Rejected> {
        use State::*;

        let to = |next, effect| Ok(Transition { next, effect });
        match (self, event) {
            (_, Event::End) => to(Idle, Effect::Close),
            (Idle, Event::Start) => to(AwaitingPhone, Effect::Welcome),
            (AwaitingPhone | AwaitingConfirmation, Event::Start) => Err(Rejected::AlreadyStarted),
            (AwaitingPhone, Event::Text(text)) => {
                let phone = text.trim();
                if phone.is_empty() {
                    Err(Rejected::ExpectedPhone)
                } else {
                    to(AwaitingConfirmation, Effect::RecordPhone(phone.to_owned()))
                }
            }
            (AwaitingPhone, Event::Unsupported) => Err(Rejected::ExpectedPhone),
            (Idle, Event::Text(_) | Event::Unsupported) => Err(Rejected::NotStarted),
            (AwaitingConfirmation, Event::Text(_) | Event::Unsupported) => {
                Err(Rejected::AwaitingOutcome)
            }
        }
    }
}

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "start a rental request.")]
    Start,
    #[command(description = "finish the current request.")]
    End,
    #[command(description = "show prices.")]
    Price,
    #[command(description = "how renting works.")]
    Instructions,
    #[command(
        description = "resend the screenshot to a user (admin).",
        parse_with = rest_of_line
    )]
    SendCode(String),
    #[command(description = "open the confirmation panel (admin).")]
    Admin,
}

fn rest_of_line(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_owned(),))
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub fn schema() -> UpdateHandler<HandlerError> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(renter::start))
        .branch(case![Command::End].endpoint(renter::end))
        .branch(case![Command::Price].endpoint(admin::price))
        .branch(case![Command::Instructions].endpoint(admin::instructions))
        .branch(case![Command::SendCode(arg)].endpoint(admin::send_code))
        .branch(case![Command::Admin].endpoint(admin::panel));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(renter::message));

    let callback_handler = Update::filter_callback_query().endpoint(callbacks::callback);

    dptree::entry()
        .branch(dialogue::enter::<Update, InMemStorage<State>, State, _>().branch(message_handler))
        .branch(callback_handler)
}
