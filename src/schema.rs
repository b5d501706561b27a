table! {
    article_likes (article_id, user_id) {
        article_id -> Int4,
        user_id -> Int4,
    }
}

table! {
    articles (id) {
        id -> Int4,
        title -> Varchar,
        lead -> Varchar,
        body -> Text,
        category -> Varchar,
        image -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
        author_id -> Int4,
    }
}

table! {
    comments (id) {
        id -> Int4,
        body -> Text,
        published_at -> Timestamp,
        author_id -> Int4,
        article_id -> Int4,
    }
}

table! {
    roles (id) {
        id -> Int4,
        name -> Varchar,
    }
}

table! {
    user_roles (user_id, role_id) {
        user_id -> Int4,
        role_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        pseudo -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamp,
    }
}

joinable!(article_likes -> articles (article_id));
joinable!(article_likes -> users (user_id));
joinable!(articles -> users (author_id));
joinable!(comments -> articles (article_id));
joinable!(comments -> users (author_id));
joinable!(user_roles -> roles (role_id));
joinable!(user_roles -> users (user_id));

allow_tables_to_appear_in_same_query!(
    article_likes,
    articles,
    comments,
    roles,
    user_roles,
    users,
);
