table! {
    blog_posts (id) {
        id -> Int4,
        user_id -> Nullable<Varchar>,
        author_name -> Varchar,
        title -> Varchar,
        content -> Text,
        image_path -> Nullable<Varchar>,
        published -> Bool,
        likes -> Int4,
        created_at -> Timestamp,
    }
}

table! {
    chat_messages (id) {
        id -> Int4,
        room_id -> Varchar,
        sender_id -> Varchar,
        sender_name -> Varchar,
        content -> Text,
        sent_at -> Timestamp,
    }
}

table! {
    chats (id) {
        id -> Varchar,
        user_low -> Varchar,
        user_high -> Varchar,
        initiator_id -> Varchar,
        accepted -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Int4,
        post_id -> Int4,
        user_id -> Varchar,
        username -> Varchar,
        body -> Text,
        created_at -> Timestamp,
    }
}

table! {
    liked_blogs (post_id, user_id) {
        post_id -> Int4,
        user_id -> Varchar,
        liked -> Bool,
    }
}

table! {
    notifications (id) {
        id -> Int4,
        recipient_id -> Varchar,
        sender_id -> Varchar,
        content -> Text,
        created_at -> Timestamp,
        is_chat -> Bool,
    }
}

table! {
    rooms (room_id) {
        room_id -> Varchar,
        created_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Varchar,
        name -> Nullable<Varchar>,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(
    blog_posts,
    chat_messages,
    chats,
    comments,
    liked_blogs,
    notifications,
    rooms,
    users,
);
