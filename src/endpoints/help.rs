// Copyright 2025 Felipe Torres González
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! Handler for the /help command.

use crate::{CommandEng, CommandRus, HandlerResult, dialog::Customer};
use teloxide::{adaptors::Throttle, prelude::*, types::ParseMode, utils::command::BotCommands};

/// Help handler.
#[tracing::instrument(
    name = "Help handler",
    skip(bot, msg),
    fields(
        chat_id = %msg.chat.id,
    )
)]
pub async fn help(bot: Throttle<Bot>, msg: Message) -> HandlerResult {
    let lang_code = msg
        .from
        .as_ref()
        .map(|user| Customer::from(user).lang_code)
        .unwrap_or_else(|| String::from("en"));

    bot.send_message(msg.chat.id, help_message(&lang_code))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

fn help_message(lang_code: &str) -> String {
    match lang_code {
        "ru" => format!(
            "{}\n\n⚙️{}",
            include_str!("../../data/templates/help_ru.txt"),
            CommandRus::descriptions(),
        ),
        _ => format!(
            "{}\n\n⚙️{}",
            include_str!("../../data/templates/help_en.txt"),
            CommandEng::descriptions(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_listed() {
        let help = help_message("en");
        assert!(help.contains("/cancel"));
        assert!(help.starts_with("<b>🛍️ ShopBot</b>"));

        let help = help_message("ru");
        assert!(help.contains("Отменить текущий заказ"));
    }
}
