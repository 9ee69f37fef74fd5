//! # Pages
//!
//! Server-rendered HTML. Every value coming from the store or the request is
//! passed through `escape_html`; the Firebase script is already a safe
//! literal (see `firebase::to_script_literal`).
use roster::Gender;

use crate::{
    database::Person,
    firebase::to_script_literal,
    utils::{DEFAULT_ROOM, escape_html},
};

const FIREBASE_SDK: &str = "https://www.gstatic.com/firebasejs/10.12.2";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Votar</a> · <a href="/ranking">Ranking</a> · <a href="/chat">Chat</a></nav>
{body}
</body>
</html>"#,
        title = escape_html(title),
    )
}

fn gender_suffix(gender: Option<Gender>) -> String {
    gender.map(|g| format!("/{g}")).unwrap_or_default()
}

fn candidate(person: &Person, opponent: &Person, gender: Option<Gender>) -> String {
    let gender_field = gender
        .map(|g| format!(r#"<input type="hidden" name="gender" value="{g}">"#))
        .unwrap_or_default();

    format!(
        r#"<form method="post" action="/vote" class="candidate">
<input type="hidden" name="winner_id" value="{winner}">
<input type="hidden" name="loser_id" value="{loser}">
{gender_field}
<button type="submit"><img src="/static/{image}" alt="{name}"><span>{name}</span></button>
</form>"#,
        winner = person.id,
        loser = opponent.id,
        image = escape_html(&person.image),
        name = escape_html(&person.name),
    )
}

pub fn pair_page(a: &Person, b: &Person, gender: Option<Gender>) -> String {
    let body = format!(
        r#"<h1>¿Quién es más atractivo?</h1>
<main class="pair">
{left}
{right}
</main>
<p><a href="/ranking{suffix}">Ver ranking</a></p>"#,
        left = candidate(a, b, gender),
        right = candidate(b, a, gender),
        suffix = gender_suffix(gender),
    );

    layout("Facemash", &body)
}

pub fn ranking_page(people: &[Person], gender: Option<Gender>) -> String {
    let rows: String = people
        .iter()
        .enumerate()
        .map(|(index, person)| {
            format!(
                r#"<tr><td>{position}</td><td><img src="/static/{image}" alt="{name}" width="48"></td><td>{name}</td><td>{rating}</td></tr>
"#,
                position = index + 1,
                image = escape_html(&person.image),
                name = escape_html(&person.name),
                rating = person.rating,
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Ranking</h1>
<table>
<thead><tr><th>#</th><th></th><th>Nombre</th><th>Elo</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<p><a href="{back}">Seguir votando</a></p>"#,
        back = gender.map(|g| format!("/vote/{g}")).unwrap_or_else(|| "/".to_string()),
    );

    layout("Ranking", &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Acceso</h1>
{error}
<form method="post" action="/login">
<input type="password" name="password" placeholder="Contraseña" autofocus required>
<button type="submit">Entrar</button>
</form>"#
    );

    layout("Acceso", &body)
}

pub fn chat_page(firebase_script: &str) -> String {
    let body = format!(
        r#"<h1>Salas</h1>
<form method="get" action="/room">
<input type="text" name="name" placeholder="{DEFAULT_ROOM}">
<button type="submit">Entrar a la sala</button>
</form>
<p><a href="/logout">Salir</a></p>
<script>
{firebase_script}
</script>"#
    );

    layout("Chat", &body)
}

pub fn room_page(room: &str, firebase_script: &str) -> String {
    let body = format!(
        r#"<h1>Sala: {room_html}</h1>
<ul id="messages"></ul>
<form id="send">
<input type="text" id="message" autocomplete="off" required>
<button type="submit">Enviar</button>
</form>
<p><a href="/chat">Otras salas</a> · <a href="/logout">Salir</a></p>
<script src="{FIREBASE_SDK}/firebase-app-compat.js"></script>
<script src="{FIREBASE_SDK}/firebase-firestore-compat.js"></script>
<script>
{firebase_script}
window.__room = {room_literal};
firebase.initializeApp(window.__firebase_config);
const messages = firebase.firestore()
  .collection("artifacts").doc(window.__app_id)
  .collection("rooms").doc(window.__room)
  .collection("messages");
messages.orderBy("sent").limitToLast(100).onSnapshot((snapshot) => {{
  const list = document.getElementById("messages");
  list.replaceChildren(...snapshot.docs.map((doc) => {{
    const item = document.createElement("li");
    item.textContent = doc.data().text;
    return item;
  }}));
}});
document.getElementById("send").addEventListener("submit", (event) => {{
  event.preventDefault();
  const input = document.getElementById("message");
  messages.add({{ text: input.value, sent: firebase.firestore.FieldValue.serverTimestamp() }});
  input.value = "";
}});
</script>"#,
        room_html = escape_html(room),
        room_literal = to_script_literal(room),
    );

    layout(&format!("Sala {room}"), &body)
}
